//! Randomized search tree: a binary search tree whose nodes also satisfy the max-heap property
//! over randomly drawn priorities.

mod set;
mod tree;

pub use self::set::RstSet;
pub use self::tree::Direction;

#[cfg(test)]
pub(crate) use self::test_util::Script;

#[cfg(test)]
mod test_util {
    use rand::Rng;

    /// Priority source that replays a fixed sequence of values.
    pub struct Script {
        values: Vec<u32>,
        index: usize,
    }

    impl Script {
        pub fn new(values: Vec<u32>) -> Self {
            Script { values, index: 0 }
        }
    }

    impl Rng for Script {
        fn next_u32(&mut self) -> u32 {
            let ret = self.values[self.index];
            self.index += 1;
            ret
        }
    }
}
