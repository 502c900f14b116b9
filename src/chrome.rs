//! Navbar and scroll chrome state.

use std::rc::Rc;

use yew::Reducible;

pub const NAV_SCROLLED_PX: f64 = 4.0;
pub const BACK_TO_TOP_PX: f64 = 300.0;

/// Navbar gets a solid background once scrolled, or while the mobile menu is open.
pub fn nav_scrolled(scroll_y: f64, menu_open: bool) -> bool {
    menu_open || scroll_y > NAV_SCROLLED_PX
}

pub fn shows_back_to_top(scroll_y: f64) -> bool {
    scroll_y > BACK_TO_TOP_PX
}

/// Sections currently inside the highlight band of the viewport.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ActiveSections {
    visible: Vec<String>,
}

pub enum SectionChange {
    Entered(String),
    Left(String),
}

impl ActiveSections {
    pub fn is_active(&self, id: &str) -> bool {
        self.visible.iter().any(|v| v == id)
    }
}

impl Reducible for ActiveSections {
    type Action = SectionChange;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut visible = self.visible.clone();
        match action {
            SectionChange::Entered(id) if !self.is_active(&id) => visible.push(id),
            SectionChange::Left(id) => visible.retain(|v| *v != id),
            SectionChange::Entered(_) => return self,
        }
        Rc::new(Self { visible })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn navbar_thresholds() {
        assert!(!nav_scrolled(0.0, false));
        assert!(!nav_scrolled(4.0, false));
        assert!(nav_scrolled(4.5, false));
        assert!(nav_scrolled(0.0, true));
    }

    #[test]
    fn back_to_top_after_300px() {
        assert!(!shows_back_to_top(300.0));
        assert!(shows_back_to_top(301.0));
    }

    #[test]
    fn sections_enter_and_leave_independently() {
        let state = Rc::new(ActiveSections::default());
        let state = state.reduce(SectionChange::Entered("pricing".into()));
        let state = state.reduce(SectionChange::Entered("contact".into()));
        let state = state.reduce(SectionChange::Entered("pricing".into()));
        assert_eq!(state.visible, vec!["pricing".to_string(), "contact".to_string()]);

        let state = state.reduce(SectionChange::Left("pricing".into()));
        assert!(!state.is_active("pricing"));
        assert!(state.is_active("contact"));
    }
}
