//! Filtered cursor demo: list every member name in a document.
//!
//! Run with: cargo run --example pick_keys

use riffle_core::{json_cursor, Event, EventKind, StreamCursor};

const DOC: &str = r#"{
  "user": {"name": "ada", "roles": ["admin", "dev"]},
  "limits": {"rate": 100, "burst": 20}
}"#;

fn main() {
    let cursor = json_cursor(DOC);
    let mut keys = match cursor.filter(|event, _| event.kind() == EventKind::Key) {
        Ok(filtered) => filtered,
        Err(code) => {
            eprintln!("error: {code}");
            std::process::exit(1);
        }
    };
    while !keys.done() {
        if let Event::Key(name) = keys.current() {
            println!("{} (line {})", name, keys.context().line);
        }
        if let Err(code) = keys.advance() {
            eprintln!("error: {code}");
            std::process::exit(1);
        }
    }
}
