//! Testing utilities and harness for reakt

pub mod testing;

pub use testing::*;

pub mod prelude {
    pub use crate::testing::*;
}
