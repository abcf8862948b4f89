//! Nearest neighbour and range queries, each with a recursive and an explicit-stack traversal.

mod nearest;
mod range;
