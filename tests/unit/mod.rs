//! Unit Tests Module
//!
//! Pure computations: attendance arithmetic, calendar windows and the grade
//! state machine.

mod grade_state_tests;
