#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Projects,
    About,
    Contact,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Projects, Section::About, Section::Contact];

    pub fn label(self) -> &'static str {
        match self {
            Section::Projects => "Projects",
            Section::About => "About",
            Section::Contact => "Contact",
        }
    }
}

/// Collapsible navigation menu. Starts collapsed.
#[derive(Clone, Debug, Default)]
pub struct NavDisclosure {
    expanded: bool,
    cursor: usize,
}

impl NavDisclosure {
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    pub fn is_open(&self) -> bool {
        self.expanded
    }

    pub fn aria_expanded(&self) -> &'static str {
        if self.expanded {
            "true"
        } else {
            "false"
        }
    }

    pub fn links(&self) -> &'static [Section] {
        &Section::ALL
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let last = Section::ALL.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    /// Following any link closes the menu.
    pub fn select(&mut self, index: usize) -> Option<Section> {
        let section = Section::ALL.get(index).copied()?;
        self.collapse();
        self.cursor = index;
        Some(section)
    }
}
