//! Collision resolution for target file names.
//!
//! [`NameClaims`] is seeded from the directory listing once, before the first
//! rename, and updated as each rename commits. Later files therefore see the
//! names earlier files took in the same run, without another directory stat
//! per candidate.

use std::collections::HashSet;

/// Where a file should end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameResolution {
    /// The file already carries the name its title asks for.
    AlreadyCorrect,
    /// Rename to this free name.
    Rename(String),
}

/// The set of entry names in the directory, as this run last left it.
#[derive(Debug, Clone, Default)]
pub struct NameClaims {
    taken: HashSet<String>,
}

impl NameClaims {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            taken: names.into_iter().collect(),
        }
    }

    pub fn is_claimed(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Choose a target name for `stem` for the file currently named `current`.
    ///
    /// Tries `stem.pdf`, then `stem (1).pdf`, `stem (2).pdf`, … and stops at
    /// the first name that is free or is the file's own name.
    ///
    /// Reaching the file's own name counts as already correct even when it
    /// is a disambiguated one: `Paper (1).pdf` titled "Paper" next to
    /// `Paper.pdf` stays put instead of moving to `Paper (2).pdf`, so a
    /// second run over the same folder renames nothing.
    pub fn resolve(&self, stem: &str, current: &str) -> NameResolution {
        let mut candidate = format!("{stem}.pdf");
        let mut n = 0u32;
        loop {
            if candidate == current {
                return NameResolution::AlreadyCorrect;
            }
            if !self.is_claimed(&candidate) {
                return NameResolution::Rename(candidate);
            }
            n += 1;
            candidate = format!("{stem} ({n}).pdf");
        }
    }

    /// Record a committed rename.
    pub fn commit(&mut self, from: &str, to: &str) {
        self.taken.remove(from);
        self.taken.insert(to.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(names: &[&str]) -> NameClaims {
        NameClaims::new(names.iter().map(|s| s.to_string()))
    }

    #[test]
    fn free_name_is_used_as_is() {
        let c = claims(&["a.pdf"]);
        assert_eq!(
            c.resolve("A Study", "a.pdf"),
            NameResolution::Rename("A Study.pdf".into())
        );
    }

    #[test]
    fn identical_name_is_already_correct() {
        let c = claims(&["A Study.pdf"]);
        assert_eq!(c.resolve("A Study", "A Study.pdf"), NameResolution::AlreadyCorrect);
    }

    #[test]
    fn disambiguators_count_up_from_one() {
        let mut c = claims(&["Paper.pdf", "x.pdf", "y.pdf"]);

        let first = c.resolve("Paper", "x.pdf");
        assert_eq!(first, NameResolution::Rename("Paper (1).pdf".into()));
        c.commit("x.pdf", "Paper (1).pdf");

        let second = c.resolve("Paper", "y.pdf");
        assert_eq!(second, NameResolution::Rename("Paper (2).pdf".into()));
        c.commit("y.pdf", "Paper (2).pdf");

        assert!(!c.is_claimed("x.pdf"));
        assert!(c.is_claimed("Paper (2).pdf"));
    }

    #[test]
    fn own_disambiguated_name_is_already_correct() {
        let c = claims(&["Paper.pdf", "Paper (1).pdf"]);
        assert_eq!(
            c.resolve("Paper", "Paper (1).pdf"),
            NameResolution::AlreadyCorrect
        );
    }

    #[test]
    fn released_name_can_be_reused() {
        let mut c = claims(&["Old.pdf", "z.pdf"]);
        c.commit("Old.pdf", "New.pdf");
        assert_eq!(c.resolve("Old", "z.pdf"), NameResolution::Rename("Old.pdf".into()));
    }

    #[test]
    fn any_claimed_entry_blocks_the_name() {
        let c = claims(&["Notes.pdf", "a.pdf"]);
        assert_eq!(
            c.resolve("Notes", "a.pdf"),
            NameResolution::Rename("Notes (1).pdf".into())
        );
    }
}
