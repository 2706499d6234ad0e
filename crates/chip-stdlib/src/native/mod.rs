//! Native modules making up the `LIBRARY` tree

use chip_core::runtime::Value;

pub mod array;
pub mod console;
pub mod convert;
pub mod helpers;
pub mod logic;
pub mod loops;
pub mod math;
pub mod string;

#[cfg(test)]
mod math_tests;

/// Every module in the order it appears in `LIBRARY`.
pub fn modules() -> Vec<(&'static str, Value)> {
    vec![
        ("MATH", math::module_value()),
        ("STRING", string::module_value()),
        ("CONVERT", convert::module_value()),
        ("CONSOLE", console::module_value()),
        ("LOGIC", logic::module_value()),
        ("LOOP", loops::module_value()),
        ("ARRAY", array::module_value()),
    ]
}
