use crate::models::{BlockId, BlockType};

/// Screen coordinates where the menu renders
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MenuPosition {
    pub top: f64,
    pub left: f64,
}

/// What selecting a type in the menu should do to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSelection {
    /// Menu came from `/` inside a block: change that block's type
    Retype { target: BlockId, kind: BlockType },
    /// Menu came from the trailing add-block control: append a new block
    Append { kind: BlockType },
}

/// Transient `/` command menu state
///
/// The menu never mutates the document itself. Selecting a type yields a
/// [`MenuSelection`] that the editor applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandMenu {
    is_open: bool,
    target: Option<BlockId>,
    position: MenuPosition,
    query: String,
    /// Index into the visible candidates
    highlighted: usize,
}

impl CommandMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open at `position`; reopening an open menu just repositions it
    ///
    /// `target` is the block the menu was invoked from, or `None` for the
    /// trailing add-block control.
    pub fn open(&mut self, position: MenuPosition, target: Option<BlockId>) {
        self.is_open = true;
        self.position = position;
        self.target = target;
        self.query.clear();
        self.highlighted = 0;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn target(&self) -> Option<BlockId> {
        self.target
    }

    pub fn position(&self) -> MenuPosition {
        self.position
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.highlighted = 0;
    }

    pub fn push_query(&mut self, c: char) {
        self.query.push(c);
        self.highlighted = 0;
    }

    pub fn pop_query(&mut self) {
        self.query.pop();
        self.highlighted = 0;
    }

    /// Block types whose label contains the query, case-insensitively
    pub fn candidates(&self) -> Vec<BlockType> {
        let needle = self.query.to_lowercase();
        BlockType::ALL
            .into_iter()
            .filter(|kind| kind.label().to_lowercase().contains(&needle))
            .collect()
    }

    pub fn highlighted(&self) -> Option<BlockType> {
        self.candidates().get(self.highlighted).copied()
    }

    /// Move the highlight by `delta` visible candidates, wrapping at the ends
    pub fn move_highlight(&mut self, delta: isize) {
        let count = self.candidates().len();
        if count == 0 {
            return;
        }
        let current = self.highlighted.min(count - 1) as isize;
        self.highlighted = (current + delta).rem_euclid(count as isize) as usize;
    }

    /// Resolve a selection and close the menu
    ///
    /// Returns `None`, leaving the menu untouched, when the menu is closed or
    /// `kind` is filtered out by the current query.
    pub fn select(&mut self, kind: BlockType) -> Option<MenuSelection> {
        if !self.is_open || !self.candidates().contains(&kind) {
            return None;
        }
        self.close();
        Some(match self.target {
            Some(target) => MenuSelection::Retype { target, kind },
            None => MenuSelection::Append { kind },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn open_menu(target: Option<BlockId>) -> CommandMenu {
        let mut menu = CommandMenu::new();
        menu.open(MenuPosition { top: 10.0, left: 20.0 }, target);
        menu
    }

    #[rstest]
    #[case("head")]
    #[case("HEAD")]
    #[case("Heading")]
    fn test_query_filters_headings_case_insensitively(#[case] query: &str) {
        let mut menu = open_menu(None);
        menu.set_query(query);
        assert_eq!(
            menu.candidates(),
            vec![BlockType::Heading1, BlockType::Heading2, BlockType::Heading3]
        );
    }

    #[rstest]
    #[case("list", vec![BlockType::BulletList, BlockType::NumberedList, BlockType::Todo])]
    #[case("to-do", vec![BlockType::Todo])]
    #[case("", BlockType::ALL.to_vec())]
    #[case("zzz", vec![])]
    fn test_query_filters_by_label(#[case] query: &str, #[case] expected: Vec<BlockType>) {
        let mut menu = open_menu(None);
        menu.set_query(query);
        assert_eq!(menu.candidates(), expected);
    }

    #[test]
    fn test_reopen_repositions_and_resets_query() {
        let mut menu = open_menu(None);
        menu.set_query("div");
        let target = BlockId::new();

        menu.open(MenuPosition { top: 1.0, left: 2.0 }, Some(target));

        assert!(menu.is_open());
        assert_eq!(menu.position(), MenuPosition { top: 1.0, left: 2.0 });
        assert_eq!(menu.target(), Some(target));
        assert_eq!(menu.query(), "");
    }

    #[test]
    fn test_select_with_target_retypes() {
        let target = BlockId::new();
        let mut menu = open_menu(Some(target));

        let selection = menu.select(BlockType::Heading1);

        assert_eq!(
            selection,
            Some(MenuSelection::Retype {
                target,
                kind: BlockType::Heading1
            })
        );
        assert!(!menu.is_open());
    }

    #[test]
    fn test_select_without_target_appends() {
        let mut menu = open_menu(None);
        assert_eq!(
            menu.select(BlockType::Todo),
            Some(MenuSelection::Append {
                kind: BlockType::Todo
            })
        );
        assert!(!menu.is_open());
    }

    #[test]
    fn test_select_hidden_candidate_is_rejected() {
        let mut menu = open_menu(None);
        menu.set_query("head");

        assert_eq!(menu.select(BlockType::Divider), None);
        assert!(menu.is_open());
    }

    #[test]
    fn test_select_while_closed_is_rejected() {
        let mut menu = CommandMenu::new();
        assert_eq!(menu.select(BlockType::Paragraph), None);
    }

    #[test]
    fn test_highlight_wraps_through_visible_candidates() {
        let mut menu = open_menu(None);
        menu.set_query("head");
        assert_eq!(menu.highlighted(), Some(BlockType::Heading1));

        menu.move_highlight(-1);
        assert_eq!(menu.highlighted(), Some(BlockType::Heading3));

        menu.move_highlight(1);
        menu.move_highlight(1);
        assert_eq!(menu.highlighted(), Some(BlockType::Heading2));
    }

    #[test]
    fn test_query_edit_resets_highlight() {
        let mut menu = open_menu(None);
        menu.move_highlight(2);
        assert_eq!(menu.highlighted(), Some(BlockType::Heading2));

        menu.push_query('d');
        assert_eq!(menu.highlighted(), Some(BlockType::Heading1));

        menu.pop_query();
        assert_eq!(menu.query(), "");
        assert_eq!(menu.highlighted(), Some(BlockType::Paragraph));
    }

    #[test]
    fn test_highlight_with_no_candidates() {
        let mut menu = open_menu(None);
        menu.set_query("zzz");
        menu.move_highlight(1);
        assert_eq!(menu.highlighted(), None);
    }
}
