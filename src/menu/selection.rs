use super::geometry::resolve_loop_index;

/// Highlighted sector of the active level. At most one index is selected at
/// a time; `None` means nothing is highlighted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection(Option<usize>);

impl Selection {
    pub fn none() -> Self {
        Self(None)
    }

    /// First render pre-selects index 0.
    pub fn start() -> Self {
        Self(Some(0))
    }

    pub fn index(&self) -> Option<usize> {
        self.0
    }

    /// Steps the selection by `delta`, treating an empty selection as index 0
    /// and wrapping with the same one-shot rule the geometry uses. `delta`
    /// stays within one period (input only ever produces ±1).
    pub fn move_by(&mut self, delta: i64, count: usize) {
        if count == 0 {
            return;
        }
        let current = self.0.unwrap_or(0) as i64;
        let next = resolve_loop_index(current + delta, count as i64);
        self.0 = Some(next as usize);
    }

    /// Direct set from pointer hover/press. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, count: usize) {
        if index < count {
            self.0 = Some(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_defaults_to_index_zero() {
        let mut sel = Selection::none();
        sel.move_by(1, 4);
        assert_eq!(sel.index(), Some(1));
    }

    #[test]
    fn move_round_trips_with_inverse_delta() {
        for n in 1..=8 {
            for start in 0..n {
                let mut sel = Selection::none();
                sel.set(start, n);
                sel.move_by(1, n);
                sel.move_by(-1, n);
                assert_eq!(sel.index(), Some(start), "n={n} start={start}");
            }
        }
    }

    #[test]
    fn move_wraps_at_both_ends() {
        let mut sel = Selection::start();
        sel.move_by(-1, 5);
        assert_eq!(sel.index(), Some(4));
        sel.move_by(1, 5);
        assert_eq!(sel.index(), Some(0));
    }

    #[test]
    fn set_ignores_out_of_range() {
        let mut sel = Selection::start();
        sel.set(7, 4);
        assert_eq!(sel.index(), Some(0));
        sel.set(3, 4);
        assert_eq!(sel.index(), Some(3));
    }

    #[test]
    fn move_on_empty_list_is_a_noop() {
        let mut sel = Selection::none();
        sel.move_by(1, 0);
        assert_eq!(sel.index(), None);
    }
}
