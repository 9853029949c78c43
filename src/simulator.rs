//! Balance simulator for Turbo Tycoon.
//! Run with: cargo test -p turbo-tycoon simulate_ -- --nocapture
