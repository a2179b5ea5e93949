use std::{fmt::Display, ops::Deref};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

impl Percentage {
    pub fn new_opt(value: f64) -> Option<Percentage> {
        if value.is_finite() {
            Some(Percentage(value))
        } else {
            None
        }
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Share of `part` in `whole`. Zero when there is no whole to speak of.
pub fn share(part: u64, whole: u64) -> Percentage {
    if whole == 0 {
        return Percentage(0.);
    }
    Percentage(part as f64 / whole as f64 * 100.)
}

/// Relative change from `before` to `after`. Undefined when starting from zero.
pub fn relative_change(before: f64, after: f64) -> Option<Percentage> {
    if before == 0. {
        return None;
    }
    Percentage::new_opt((after - before) / before * 100.)
}

#[cfg(test)]
mod tests {
    use super::{relative_change, share};

    #[test]
    fn test_share() {
        assert_eq!(*share(1, 4), 25.);
        assert_eq!(*share(3, 0), 0.);
        assert_eq!(share(2, 3).to_string(), "66.7%");
    }

    #[test]
    fn test_relative_change() {
        assert_eq!(relative_change(50., 100.).map(|v| *v), Some(100.));
        assert_eq!(relative_change(0., 100.), None);
    }
}
