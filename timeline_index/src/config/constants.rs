pub mod compile_time {
    pub mod tree {
        /// Height reported for an absent child
        /// BALANCE: a leaf therefore has height 0
        pub const EMPTY_HEIGHT: i32 = -1;

        /// Largest balance factor magnitude AVL discipline allows to persist
        pub const MAX_BALANCE_FACTOR: i32 = 1;

        /// Largest balance factor magnitude a single or double rotation repairs
        /// DEFENSIVE: anything beyond this is repaired by rebalancing children first
        pub const MAX_ROTATION_BALANCE_FACTOR: i32 = 2;

        /// Initial capacity for explicit traversal and descent stacks
        /// RESOURCE: covers a balanced tree of roughly four billion fragments
        pub const INITIAL_STACK_CAPACITY: usize = 32;
    }

    pub mod logging {
        /// Environment variable selecting the minimum log level
        pub const LOG_LEVEL_ENV: &str = "TIMELINE_LOG_LEVEL";

        /// Level used when the environment does not name one
        pub const DEFAULT_LOG_LEVEL: &str = "info";
    }
}
