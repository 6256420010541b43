//! Print the event stream of a JSON document read from stdin.
//!
//! Run with: cargo run --example stream_events < doc.json

use std::io::Read;

use riffle_core::{json_cursor, StreamCursor};

fn main() {
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        eprintln!("stdin was not valid UTF-8");
        std::process::exit(1);
    }

    let mut cursor = json_cursor(&input);
    let mut depth = 0usize;
    while !cursor.done() {
        let event = cursor.current();
        if event.kind().is_end_container() {
            depth -= 1;
        }
        let location = cursor.context();
        println!("{:>4}:{:<3} {}{:?}", location.line, location.column, "  ".repeat(depth), event);
        if event.kind().is_begin_container() {
            depth += 1;
        }
        if let Err(code) = cursor.advance() {
            eprintln!("error: {code} at {}", cursor.context());
            std::process::exit(1);
        }
    }
}
