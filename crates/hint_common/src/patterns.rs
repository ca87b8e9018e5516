//! Static hint tables used when the language model is unreachable.
//!
//! Declaration order is significant: lookups are first-match-wins, so
//! compound phrases ("binary search", "sliding window") must stay ahead of
//! the short generic keywords ("tree", "array", "string") they contain.

/// A lowercase keyword or phrase and the hint it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternEntry {
    pub pattern: &'static str,
    pub hint: &'static str,
}

const fn entry(pattern: &'static str, hint: &'static str) -> PatternEntry {
    PatternEntry { pattern, hint }
}

/// Primary table: problem families.
pub const PATTERN_TABLE: &[PatternEntry] = &[
    entry(
        "two sum",
        "Consider using a hash map to store complements as you iterate through the array.",
    ),
    entry(
        "reverse",
        "Think about using two pointers - one at the start and one at the end.",
    ),
    entry(
        "palindrome",
        "Compare characters from both ends moving inward, or reverse and compare.",
    ),
    entry(
        "binary search",
        "Remember the condition: if target < mid, search left; if target > mid, search right.",
    ),
    entry(
        "linked list",
        "Consider using two pointers (slow and fast) or dummy nodes for edge cases.",
    ),
    entry(
        "tree",
        "Think about recursion - process current node, then left and right subtrees.",
    ),
    entry(
        "dynamic programming",
        "Break down into subproblems. What's the base case? What's the recurrence relation?",
    ),
    entry(
        "sliding window",
        "Use two pointers to maintain a window and adjust the window size based on conditions.",
    ),
    entry(
        "graph",
        "Consider BFS for shortest path or level-order, DFS for connectivity or pathfinding.",
    ),
    entry(
        "array",
        "Consider sorting first, or using hash maps for O(1) lookups.",
    ),
    entry(
        "string",
        "Think about character frequency, sliding window, or two pointers technique.",
    ),
    entry(
        "stack",
        "LIFO structure - useful for matching parentheses, expression evaluation, or DFS.",
    ),
    entry(
        "queue",
        "FIFO structure - useful for BFS, level-order traversal, or scheduling problems.",
    ),
    entry(
        "heap",
        "Useful for finding kth largest/smallest elements or maintaining sorted order dynamically.",
    ),
    entry(
        "sort",
        "Consider the time complexity needed - O(n log n) for comparison sorts, O(n) for counting sort.",
    ),
    entry(
        "backtrack",
        "Use recursion with state management. Make a choice, explore, then undo the choice.",
    ),
    entry(
        "greedy",
        "Make locally optimal choices. Ensure the greedy choice leads to optimal solution.",
    ),
    entry(
        "trie",
        "Useful for prefix matching, autocomplete, or word search problems.",
    ),
    entry(
        "union find",
        "Great for connectivity problems, cycle detection, or grouping elements.",
    ),
];

/// Secondary table: broader keywords consulted only when the primary
/// table has no match.
pub const KEYWORD_TABLE: &[PatternEntry] = &[
    entry(
        "maximum",
        "Consider using a heap, sliding window, or dynamic programming approach.",
    ),
    entry(
        "minimum",
        "Think about greedy algorithms, binary search, or optimization techniques.",
    ),
    entry(
        "substring",
        "Try sliding window technique or two pointers approach.",
    ),
    entry(
        "subarray",
        "Consider prefix sums, sliding window, or divide and conquer.",
    ),
    entry(
        "path",
        "This might be a graph problem - consider BFS, DFS, or dynamic programming.",
    ),
    entry(
        "cycle",
        "Think about Floyd's cycle detection algorithm or graph traversal.",
    ),
    entry(
        "duplicate",
        "Consider using a set, hash map, or sorting to detect duplicates.",
    ),
    entry(
        "anagram",
        "Try sorting characters or using character frequency counting.",
    ),
    entry(
        "parentheses",
        "Stack data structure is often useful for matching problems.",
    ),
    entry(
        "interval",
        "Consider sorting intervals and using a greedy or merge approach.",
    ),
];

/// Last-resort hints when nothing in either table matches.
pub const GENERIC_HINTS: &[&str] = &[
    "Break down the problem into smaller subproblems. What's the simplest case?",
    "Consider the time and space complexity. Can you optimize by trading space for time?",
    "Think about edge cases: empty input, single element, or maximum constraints.",
    "What data structure would give you the most efficient access pattern?",
    "Can you solve this with a greedy approach, or do you need dynamic programming?",
    "Consider sorting the input first - it might reveal a pattern or simplify the solution.",
    "Think about invariants - what remains true throughout your algorithm?",
    "Can you use a hash map to reduce time complexity from O(n²) to O(n)?",
    "Consider using recursion with memoization for overlapping subproblems.",
    "Think about the problem constraints - they often hint at the expected solution complexity.",
    "Try working through a small example by hand to understand the pattern.",
    "Consider if this problem has been solved before in a different context.",
    "What would happen if you processed the data in a different order?",
    "Can you eliminate impossible cases early to reduce the search space?",
    "Think about the relationship between input size and expected time complexity.",
];

/// Look up a pattern's hint by its exact key.
pub fn hint_for(table: &[PatternEntry], pattern: &str) -> Option<&'static str> {
    table.iter().find(|e| e.pattern == pattern).map(|e| e.hint)
}
