//! Longest common subsequence over two sequences.

/// One move through the comparison matrix.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Step {
    /// The elements match, advance in both sequences.
    Diagonal,
    /// Remove the current element of the old sequence.
    Right,
    /// Insert the current element of the new sequence.
    Down,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    value: usize,
    step: Step,
}

/// Comparison matrix with one row per element of the new sequence and one
/// column per element of the old sequence, plus a trailing row and column.
///
/// Each cell holds the edit distance from that position to the end and the
/// step to take from it.
#[derive(Debug, Clone)]
pub struct LcsMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl LcsMatrix {
    /// Compares `a` (old) against `b` (new).
    ///
    /// When removing and inserting cost the same, removing wins.
    pub fn compare<A, B>(a: &[A], b: &[B], mut equals: impl FnMut(&A, &B) -> bool) -> Self {
        let (rows, cols) = (b.len(), a.len());
        let mut matrix = LcsMatrix {
            rows,
            cols,
            cells: vec![
                Cell {
                    value: 0,
                    step: Step::Diagonal,
                };
                (rows + 1) * (cols + 1)
            ],
        };

        for j in 0..cols {
            matrix.set(rows, j, cols - j, Step::Right);
        }
        for i in 0..rows {
            matrix.set(i, cols, rows - i, Step::Down);
        }

        for j in (0..cols).rev() {
            for i in (0..rows).rev() {
                if equals(&a[j], &b[i]) {
                    let value = matrix.get(i + 1, j + 1).value;
                    matrix.set(i, j, value, Step::Diagonal);
                } else {
                    let right = matrix.get(i, j + 1).value;
                    let down = matrix.get(i + 1, j).value;
                    if right <= down {
                        matrix.set(i, j, right + 1, Step::Right);
                    } else {
                        matrix.set(i, j, down + 1, Step::Down);
                    }
                }
            }
        }

        matrix
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> Cell {
        self.cells[i * (self.cols + 1) + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, value: usize, step: Step) {
        self.cells[i * (self.cols + 1) + j] = Cell { value, step };
    }

    /// Number of removals plus insertions needed to turn `a` into `b`.
    pub fn distance(&self) -> usize {
        self.get(0, 0).value
    }

    /// Walks the edit script from the start of both sequences, calling
    /// `visit(acc, step, i, j)` where `i` indexes the new sequence and `j` the
    /// old one.
    pub fn reduce<R>(&self, init: R, mut visit: impl FnMut(R, Step, usize, usize) -> R) -> R {
        let (mut i, mut j) = (0, 0);
        let mut acc = init;

        while i < self.rows || j < self.cols {
            let step = self.get(i, j).step;
            acc = visit(acc, step, i, j);
            match step {
                Step::Diagonal => {
                    i += 1;
                    j += 1;
                }
                Step::Right => j += 1,
                Step::Down => i += 1,
            }
        }

        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(a: &str, b: &str) -> String {
        let (a, b): (Vec<char>, Vec<char>) = (a.chars().collect(), b.chars().collect());
        LcsMatrix::compare(&a, &b, |x, y| x == y).reduce(String::new(), |mut s, step, i, j| {
            match step {
                Step::Diagonal => s.push('='),
                Step::Right => {
                    s.push('-');
                    s.push(a[j]);
                }
                Step::Down => {
                    s.push('+');
                    s.push(b[i]);
                }
            }
            s
        })
    }

    #[test]
    fn empty() {
        assert_eq!(script("", ""), "");
        assert_eq!(script("ab", ""), "-a-b");
        assert_eq!(script("", "ab"), "+a+b");
    }

    #[test]
    fn edit_script() {
        assert_eq!(script("abc", "abc"), "===");
        assert_eq!(script("abcd", "acd"), "=-b==");
        assert_eq!(script("acd", "abcd"), "=+b==");
    }

    #[test]
    fn removal_before_insertion() {
        assert_eq!(script("a", "b"), "-a+b");
        assert_eq!(script("xay", "xby"), "=-a+b=");
    }

    #[test]
    fn distance() {
        let a = [1, 2, 3, 4, 5];
        let b = [1, 2, 3, 6, 4, 5];
        assert_eq!(LcsMatrix::compare(&a, &b, |x, y| x == y).distance(), 1);
        assert_eq!(LcsMatrix::compare(&a, &[9], |x, y| x == y).distance(), 6);
    }
}
