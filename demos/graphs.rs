//! Shared subtrees, cycles and structured map keys.
//!
//! Run with: cargo run --example graphs

use serde_flatpath::{flatten, flatten_with_options, impl_inspect, Error, FlattenOptions};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

struct Team {
    name: &'static str,
    members: Vec<Rc<Person>>,
}
impl_inspect!(Team { name, members });

struct Person {
    name: &'static str,
    manager: RefCell<Option<Rc<Person>>>,
}
impl_inspect!(Person { name, manager });

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct Seat {
    row: u8,
    col: u8,
}
impl_inspect!(Seat { row, col });

fn main() {
    let lead = Rc::new(Person {
        name: "Grace",
        manager: RefCell::new(None),
    });
    let dev = Rc::new(Person {
        name: "Linus",
        manager: RefCell::new(Some(Rc::clone(&lead))),
    });

    // the lead is reachable twice; each branch is written in full
    let team = Team {
        name: "core",
        members: vec![Rc::clone(&lead), Rc::clone(&dev)],
    };
    match flatten(&team) {
        Ok(map) => println!("Shared subtree:\n{}\n", map),
        Err(err) => println!("unexpected error: {}", err),
    }

    // now the lead reports to the developer, closing a loop
    *lead.manager.borrow_mut() = Some(Rc::clone(&dev));
    match flatten(&team) {
        Err(Error::Cycle(cycle)) => println!("Cycle: {}\n", cycle),
        other => println!("expected a cycle, got {:?}", other),
    }
    lead.manager.borrow_mut().take();

    let seating = BTreeMap::from([
        (Seat { row: 1, col: 1 }, "Grace"),
        (Seat { row: 1, col: 2 }, "Linus"),
    ]);
    if let Ok(map) = flatten(&seating) {
        println!("Structured keys:\n{}\n", map);
    }

    let options = FlattenOptions::new().with_converter(|s: &Seat| format!("{}{}", s.row, (b'A' + s.col) as char));
    if let Ok(map) = flatten_with_options(&seating, options) {
        println!("Converted keys:\n{}", map);
    }
}
