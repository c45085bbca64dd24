#![allow(dead_code)]

use copydetect::{Comparator, DetectionConfig, PairVerdict, SourceFile};

pub const GRADES: &str = r#"
def average(scores):
    total = 0
    for s in scores:
        total += s
    if len(scores) == 0:
        return 0
    return total / len(scores)


def letter(avg):
    if avg >= 90:
        return "A"
    elif avg >= 80:
        return "B"
    return "C"
"#;

/// `GRADES` with every name changed consistently and comments added.
pub const GRADES_RENAMED: &str = r#"
# compute the mean mark
def mean(values):
    acc = 0
    for v in values:
        acc += v   # running sum
    if len(values) == 0:
        return 0
    return acc / len(values)


def grade(m):
    if m >= 90:
        return "A"
    elif m >= 80:
        return "B"
    return "C"
"#;

/// `GRADES` with the two functions swapped.
pub const GRADES_REORDERED: &str = r#"
def letter(avg):
    if avg >= 90:
        return "A"
    elif avg >= 80:
        return "B"
    return "C"


def average(scores):
    total = 0
    for s in scores:
        total += s
    if len(scores) == 0:
        return 0
    return total / len(scores)
"#;

/// `GRADES` with a missing closing parenthesis in the second signature.
pub const GRADES_BROKEN: &str = r#"
def average(scores):
    total = 0
    for s in scores:
        total += s
    if len(scores) == 0:
        return 0
    return total / len(scores)


def letter(avg:
    if avg >= 90:
        return "A"
    elif avg >= 80:
        return "B"
    return "C"
"#;

/// Structurally unrelated to `GRADES`.
pub const INVENTORY: &str = r#"
class Inventory:
    def __init__(self):
        self.items = {}

    def add(self, name, qty=1):
        self.items[name] = self.items.get(name, 0) + qty

    def report(self):
        lines = [f"{k}: {v}" for k, v in sorted(self.items.items())]
        return "\n".join(lines)


inv = Inventory()
inv.add("apple", 3)
inv.add("pear")
print(inv.report())
"#;

pub const WORDS: &str = r#"
import sys

counts = {}
with open(sys.argv[1]) as fh:
    for line in fh:
        for word in line.split():
            counts[word.lower()] = counts.get(word.lower(), 0) + 1

top = sorted(counts.items(), key=lambda kv: -kv[1])[:10]
for word, n in top:
    print(word, n)
"#;

pub fn comparator() -> Comparator {
    Comparator::new(DetectionConfig::default()).expect("default config is valid")
}

pub fn compare(left: &str, right: &str) -> PairVerdict {
    comparator()
        .compare_files(
            SourceFile::new("left.py", left),
            SourceFile::new("right.py", right),
        )
        .expect("comparison should succeed")
}

pub fn corpus() -> Vec<(&'static str, &'static str)> {
    vec![
        ("grades.py", GRADES),
        ("grades_renamed.py", GRADES_RENAMED),
        ("grades_reordered.py", GRADES_REORDERED),
        ("grades_broken.py", GRADES_BROKEN),
        ("inventory.py", INVENTORY),
        ("words.py", WORDS),
    ]
}
