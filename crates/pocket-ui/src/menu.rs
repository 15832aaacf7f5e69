//! Menu model shared by the menu, gallery and selector loops.
//!
//! A [`Menu`] owns an ordered list of [`MenuItem`]s, each of which owns an
//! ordered list of [`MenuOption`]s. Items are addressed by position; the
//! loops remember the selected position in [`Menu::selected`] so reopening
//! a menu puts the cursor back where the user left it.

use crate::image::Icon;

/// Leading character that turns an item caption into a section header.
pub const HEADER_MARKER: char = '\t';

/// One choice in an item's option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub text: String,
    pub value: i64,
}

/// An entry in a [`Menu`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItem {
    pub id: u32,
    pub caption: Option<String>,
    pub icon: Option<Icon>,
    /// Opaque value for the caller, e.g. file attributes in the browser.
    pub param: u32,
    pub help_text: Option<String>,
    pub options: Vec<MenuOption>,
    /// Position in `options` of the current choice.
    pub selected_option: Option<usize>,
}

impl MenuItem {
    pub fn new(caption: Option<&str>, id: u32) -> Self {
        Self {
            id,
            caption: caption.map(str::to_string),
            ..Self::default()
        }
    }

    /// Section headers are drawn underlined and never take the cursor.
    pub fn is_header(&self) -> bool {
        self.caption
            .as_deref()
            .is_some_and(|c| c.starts_with(HEADER_MARKER))
    }

    /// True for items the menu cursor may land on.
    pub fn is_selectable(&self) -> bool {
        self.caption.is_some() && !self.is_header()
    }

    /// Caption as displayed, without the header marker.
    pub fn display_caption(&self) -> Option<&str> {
        self.caption
            .as_deref()
            .map(|c| c.strip_prefix(HEADER_MARKER).unwrap_or(c))
    }

    pub fn set_caption(&mut self, caption: Option<&str>) {
        self.caption = caption.map(str::to_string);
    }

    pub fn set_help_text(&mut self, help: Option<&str>) {
        self.help_text = help.map(str::to_string);
    }

    /// Append an option, optionally making it the current choice. Returns
    /// its position.
    pub fn append_option(&mut self, text: &str, value: i64, select: bool) -> usize {
        self.options.push(MenuOption {
            text: text.to_string(),
            value,
        });
        let pos = self.options.len() - 1;
        if select {
            self.selected_option = Some(pos);
        }
        pos
    }

    /// Select the option at `index`. Out of range indices leave the current
    /// choice untouched.
    pub fn select_option_by_index(&mut self, index: usize) -> bool {
        if index < self.options.len() {
            self.selected_option = Some(index);
            true
        } else {
            false
        }
    }

    /// Select the first option carrying `value`.
    pub fn select_option_by_value(&mut self, value: i64) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(pos) => {
                self.selected_option = Some(pos);
                true
            },
            None => false,
        }
    }

    /// Replace the text and value of the option at `index`.
    pub fn modify_option(&mut self, index: usize, text: &str, value: i64) -> bool {
        match self.options.get_mut(index) {
            Some(option) => {
                option.text = text.to_string();
                option.value = value;
                true
            },
            None => false,
        }
    }

    pub fn clear_options(&mut self) {
        self.options.clear();
        self.selected_option = None;
    }

    pub fn selected_option(&self) -> Option<&MenuOption> {
        self.selected_option.and_then(|i| self.options.get(i))
    }

    /// True when the option list is worth expanding.
    pub fn has_choices(&self) -> bool {
        self.options.len() > 1
    }
}

/// Static description of an option, used by [`Menu::load`].
#[derive(Debug, Clone, Copy)]
pub struct MenuOptionDef<'a> {
    pub text: &'a str,
    pub value: i64,
}

impl<'a> MenuOptionDef<'a> {
    pub const fn new(text: &'a str, value: i64) -> Self {
        Self { text, value }
    }
}

/// Static description of an item, used by [`Menu::load`].
#[derive(Debug, Clone, Copy)]
pub struct MenuItemDef<'a> {
    pub caption: &'a str,
    pub header: bool,
    pub id: u32,
    pub options: &'a [MenuOptionDef<'a>],
    pub selected_index: Option<usize>,
    pub help_text: Option<&'a str>,
}

impl<'a> MenuItemDef<'a> {
    /// A section header.
    pub const fn header(text: &'a str) -> Self {
        Self {
            caption: text,
            header: true,
            id: 0,
            options: &[],
            selected_index: None,
            help_text: None,
        }
    }

    /// A regular item.
    pub const fn item(
        caption: &'a str,
        id: u32,
        options: &'a [MenuOptionDef<'a>],
        selected_index: Option<usize>,
        help_text: Option<&'a str>,
    ) -> Self {
        Self {
            caption,
            header: false,
            id,
            options,
            selected_index,
            help_text,
        }
    }
}

/// Ordered list of items plus the remembered selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    items: Vec<MenuItem>,
    /// Position of the item that held the cursor when a loop last exited.
    pub selected: Option<usize>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a menu from static definitions.
    pub fn from_defs(defs: &[MenuItemDef<'_>]) -> Self {
        let mut menu = Self::new();
        menu.load(defs);
        menu
    }

    /// Replace the contents with `defs`.
    pub fn load(&mut self, defs: &[MenuItemDef<'_>]) {
        self.clear();
        for def in defs {
            let caption = if def.header {
                format!("{HEADER_MARKER}{}", def.caption)
            } else {
                def.caption.to_string()
            };
            let item = self.append_item(Some(&caption), def.id);
            for option in def.options {
                item.append_option(option.text, option.value, false);
            }
            if let Some(index) = def.selected_index {
                item.select_option_by_index(index);
            }
            item.set_help_text(def.help_text);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = None;
    }

    /// Append an item and return it for further setup.
    pub fn append_item(&mut self, caption: Option<&str>, id: u32) -> &mut MenuItem {
        self.items.push(MenuItem::new(caption, id));
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MenuItem> {
        self.items.iter()
    }

    /// Item at position `index`.
    pub fn item(&self, index: usize) -> Option<&MenuItem> {
        self.items.get(index)
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut MenuItem> {
        self.items.get_mut(index)
    }

    pub fn position_by_id(&self, id: u32) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    pub fn find_item_by_id(&self, id: u32) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn find_item_by_id_mut(&mut self, id: u32) -> Option<&mut MenuItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// The remembered selection, if it still points at an item.
    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.selected.and_then(|i| self.items.get(i))
    }

    /// Position of the first item the cursor may land on.
    pub fn first_selectable(&self) -> Option<usize> {
        self.items.iter().position(MenuItem::is_selectable)
    }
}

impl<'a> IntoIterator for &'a Menu {
    type Item = &'a MenuItem;
    type IntoIter = std::slice::Iter<'a, MenuItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
