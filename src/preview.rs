use crate::{
    entry::Entry,
    materialize::{Outcome, Step},
};
use colored::Colorize;
use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::Write,
    path::{Path, PathBuf},
    rc::Rc,
};

/// Represents a node in the tree (either file or directory).
#[derive(Debug)]
struct TreeNode {
    name: String,
    children: Vec<Rc<RefCell<TreeNode>>>,
    is_file: bool,
}
impl TreeNode {
    fn new(name: String, is_file: bool) -> Self {
        Self {
            name,
            children: Vec::new(),
            is_file,
        }
    }
}

/// Build the directory tree from parsed entries, returning the root node.
fn build_tree(entries: &[Entry], root_name: &str) -> Rc<RefCell<TreeNode>> {
    let root = Rc::new(RefCell::new(TreeNode::new(root_name.to_string(), false)));

    // map relative path to node, the root sits at the empty path
    let mut lookup: HashMap<PathBuf, Rc<RefCell<TreeNode>>> = HashMap::new();
    lookup.insert(PathBuf::new(), Rc::clone(&root));

    for entry in entries {
        // a name like `a/b.js` has no node for `a`, so hang it off the closest known ancestor
        let (parent_path, parent_node) = entry
            .path
            .ancestors()
            .skip(1)
            .find_map(|ancestor| {
                lookup
                    .get(ancestor)
                    .map(|node| (ancestor.to_path_buf(), Rc::clone(node)))
            })
            .unwrap_or_else(|| (PathBuf::new(), Rc::clone(&root)));

        let child_name = entry
            .path
            .strip_prefix(&parent_path)
            .unwrap_or(&entry.path)
            .display()
            .to_string();

        let new_child = Rc::new(RefCell::new(TreeNode::new(child_name, entry.is_file())));

        parent_node
            .borrow_mut()
            .children
            .push(Rc::clone(&new_child));

        if entry.is_folder() {
            lookup.insert(entry.path.clone(), new_child);
        }
    }

    root
}

fn write_tree(out: &mut String, node: &Rc<RefCell<TreeNode>>, prefix: &str, is_last: bool) {
    let node_borrow = node.borrow();

    let connector = if is_last { "└── " } else { "├── " };
    let name = if node_borrow.is_file {
        node_borrow.name.green()
    } else {
        node_borrow.name.blue()
    };
    let _ = writeln!(out, "{}{}{}", prefix.yellow(), connector.yellow(), name);

    let child_prefix = if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let len = node_borrow.children.len();
    for (i, child) in node_borrow.children.iter().enumerate() {
        let last = i == len - 1;
        write_tree(out, child, &child_prefix, last);
    }
}

/// Renders entries as a box-drawing tree under a node named after `destination`.
pub fn render_tree(entries: &[Entry], destination: &Path) -> String {
    let root_name = destination
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| destination.display().to_string());

    let tree_root = build_tree(entries, &root_name);

    let mut out = String::new();
    write_tree(&mut out, &tree_root, "", true);
    out
}

pub fn preview_as_tree(entries: &[Entry], destination: &Path) {
    println!(
        "Legend: {} = (directory), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    let fancy_prompt = format!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Preview".bold().bright_blue(),
    );

    println!("{}", fancy_prompt);

    print!("{}", render_tree(entries, destination));

    println!();
}

/// Renders one line per entry: level, kind and path.
pub fn render_table(entries: &[Entry]) -> String {
    let mut out = String::new();

    for entry in entries {
        let _ = writeln!(
            out,
            "{:>3}  {:<6}  {}",
            entry.level,
            entry.kind.to_string(),
            entry.path.display()
        );
    }

    out
}

/// Formats a materialization step the way it is reported on the terminal.
pub fn format_step(step: &Step) -> String {
    let label = match &step.outcome {
        Outcome::Created => "create".green(),
        Outcome::AlreadyExists => "exists".yellow(),
        Outcome::Failed(_) => "failed".red(),
    };

    match &step.outcome {
        Outcome::Failed(reason) => format!(
            "{} {} {} ({})",
            label,
            step.entry.kind,
            step.entry.path.display(),
            reason
        ),
        _ => format!("{} {} {}", label, step.entry.kind, step.entry.path.display()),
    }
}
