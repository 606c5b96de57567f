//! File driver: indexes integer points from a data file and dumps the tree.
//!
//! Usage: `grit [FILE] [X1 Y1 X2 Y2]`
//!
//! Reads whitespace-separated `x y` integer pairs from FILE (default
//! `data.txt`), inserts each as a degenerate rectangle, and prints a
//! pre-order dump of the resulting tree. When a search window is given as
//! four further integers, every stored rectangle overlapping it is printed
//! as well.

use grit::geometry::{Point, Rect};
use grit::rtree::{NodeKind, RTree};
use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = args.first().map(String::as_str).unwrap_or("data.txt");

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("File opening failed: {path}: {err}");
            return ExitCode::from(1);
        }
    };

    let mut coords = Vec::new();
    for token in raw.split_whitespace() {
        match token.parse::<i32>() {
            Ok(value) => coords.push(value),
            Err(_) => {
                eprintln!("Invalid input in {path}: expected an integer, got {token:?}");
                return ExitCode::from(1);
            }
        }
    }
    if coords.len() % 2 != 0 {
        eprintln!("Invalid input in {path}: odd number of coordinates");
        return ExitCode::from(1);
    }

    let mut tree = RTree::new();
    for pair in coords.chunks_exact(2) {
        let point = Point::new(pair[0], pair[1]);
        if let Err(err) = tree.insert(point, point) {
            eprintln!("Insert failed: {err}");
            return ExitCode::from(1);
        }
    }

    print_tree(&tree);

    if let Some(window) = parse_window(args.get(1..).unwrap_or(&[])) {
        println!("-----------------------------------------");
        tree.search(&window, |rect| {
            println!("Search MBR overlaps with leaf element: {}", format_leaf(rect));
        });
    }

    ExitCode::SUCCESS
}

/// Pre-order dump, one node per line.
fn print_tree(tree: &RTree) {
    if let Some(mbr) = tree.mbr() {
        println!("Tree MBR: {mbr}");
    } else {
        println!("Tree MBR: (empty)");
    }
    tree.preorder(|kind, mbrs| {
        let label = match kind {
            NodeKind::Root => "Root Node",
            NodeKind::Internal => "Internal Node",
            NodeKind::Leaf => "Leaf Node",
        };
        let rendered: Vec<String> = mbrs
            .iter()
            .map(|mbr| {
                if kind == NodeKind::Leaf {
                    format_leaf(mbr)
                } else {
                    mbr.to_string()
                }
            })
            .collect();
        println!("{label}: {}", rendered.join(", "));
    });
}

/// Leaf entries that are points print as a single coordinate pair.
fn format_leaf(rect: &Rect) -> String {
    if rect.is_point() {
        rect.bottom_left.to_string()
    } else {
        rect.to_string()
    }
}

/// Interprets four trailing integers as a search window, ordering the
/// corners so any two opposite corners are accepted.
fn parse_window(args: &[String]) -> Option<Rect> {
    if args.len() != 4 {
        return None;
    }
    let mut values = [0i32; 4];
    for (slot, arg) in args.iter().enumerate() {
        values[slot] = arg.parse().ok()?;
    }
    let bottom_left = Point::new(values[0].min(values[2]), values[1].min(values[3]));
    let top_right = Point::new(values[0].max(values[2]), values[1].max(values[3]));
    Some(Rect::new(bottom_left, top_right))
}
