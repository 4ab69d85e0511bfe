//! Memory model for the interpreter
//!
//! - [`value`]: Runtime value representation
//! - [`stack`]: Lexical scope stack, shared with the validation pass
//!
//! Every variable lives in its own shared [`Slot`]. Binding a reference
//! parameter clones the caller's `Slot`, so writes through either name are
//! seen by both; binding a value parameter creates a fresh `Slot` around a
//! deep copy.

pub mod stack;
pub mod value;

use std::cell::RefCell;
use std::rc::Rc;
use value::Value;

/// Storage cell for one variable
pub type Slot = Rc<RefCell<Value>>;

pub fn new_slot(value: Value) -> Slot {
    Rc::new(RefCell::new(value))
}
