//! Responsive navigation menu with exclusive dropdowns.

use crate::config::MenuConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropdownItem {
    pub label: String,
    pub links: Vec<String>,
    pub expanded: bool,
}

pub struct NavMenu {
    /// Whether the menu panel is shown
    pub shown: bool,
    pub items: Vec<DropdownItem>,
    /// Viewport width at which dropdowns are collapsed
    pub breakpoint: u16,
}

impl NavMenu {
    pub fn new(config: &MenuConfig) -> Self {
        Self {
            shown: false,
            items: config
                .items
                .iter()
                .map(|item| DropdownItem {
                    label: item.label.clone(),
                    links: item.links.clone(),
                    expanded: false,
                })
                .collect(),
            breakpoint: config.breakpoint,
        }
    }

    pub fn toggle_menu(&mut self) {
        self.shown = !self.shown;
    }

    /// Toggles item `index` and collapses whichever other item was open.
    pub fn toggle_dropdown(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }
        let open = self.expanded();
        self.items[index].expanded = !self.items[index].expanded;
        if let Some(other) = open.filter(|other| *other != index) {
            self.items[other].expanded = false;
        }
    }

    /// Index of the open dropdown, if any.
    pub fn expanded(&self) -> Option<usize> {
        self.items.iter().position(|item| item.expanded)
    }

    /// Collapses every dropdown once the viewport is wide enough.
    pub fn on_resize(&mut self, width: u16) {
        if width >= self.breakpoint {
            for item in self.items.iter_mut() {
                item.expanded = false;
            }
        }
    }

    /// Text rows of the panel, or nothing when hidden.
    pub fn lines(&self) -> Vec<String> {
        if !self.shown {
            return Vec::new();
        }
        let mut lines = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            let marker = match (item.links.is_empty(), item.expanded) {
                (true, _) => ' ',
                (false, true) => '▾',
                (false, false) => '▸',
            };
            lines.push(format!(" {} {} {}", i + 1, marker, item.label));
            if item.expanded {
                lines.extend(item.links.iter().map(|link| format!("       {}", link)));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> NavMenu {
        NavMenu::new(&MenuConfig::default())
    }

    #[test]
    fn test_toggle_menu() {
        let mut menu = menu();
        assert!(menu.lines().is_empty());
        menu.toggle_menu();
        assert!(menu.shown);
        assert_eq!(menu.lines().len(), menu.items.len());
        menu.toggle_menu();
        assert!(!menu.shown);
    }

    #[test]
    fn test_only_one_dropdown_open() {
        let mut menu = menu();
        menu.toggle_dropdown(1);
        assert_eq!(menu.expanded(), Some(1));
        menu.toggle_dropdown(2);
        assert_eq!(menu.expanded(), Some(2));
        assert!(!menu.items[1].expanded);
        menu.toggle_dropdown(2);
        assert_eq!(menu.expanded(), None);
    }

    #[test]
    fn test_unknown_index_ignored() {
        let mut menu = menu();
        menu.toggle_dropdown(1);
        menu.toggle_dropdown(42);
        assert_eq!(menu.expanded(), Some(1));
    }

    #[test]
    fn test_wide_resize_collapses() {
        let mut menu = menu();
        menu.toggle_dropdown(1);
        menu.on_resize(80);
        assert_eq!(menu.expanded(), Some(1));
        menu.on_resize(menu.breakpoint);
        assert_eq!(menu.expanded(), None);
    }

    #[test]
    fn test_expanded_item_lists_links() {
        let mut menu = menu();
        menu.toggle_menu();
        menu.toggle_dropdown(1);
        let lines = menu.lines();
        assert_eq!(lines.len(), menu.items.len() + menu.items[1].links.len());
        assert!(lines[2].contains("Education"));
    }
}
