//! The parsed-source holder.

use kiln_data_parser::DataNode;
use kiln_recipe_parser::Recipe;

/// The result of parsing one source file.
///
/// The kind is determined by which entry grammar was invoked, never by
/// content sniffing. The typed accessors fail fast on misuse: asking a
/// recipe holder for data is a programming error in the caller, not a
/// condition to report through the log.
#[derive(Debug, Default)]
pub enum SourceAst {
    /// Nothing parsed yet.
    #[default]
    Empty,
    /// A parsed recipe.
    Recipe(Recipe),
    /// A parsed data tree.
    Data(DataNode),
}

impl SourceAst {
    /// Returns `true` when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        matches!(self, SourceAst::Empty)
    }

    /// Returns `true` when a recipe is held.
    pub fn is_recipe(&self) -> bool {
        matches!(self, SourceAst::Recipe(_))
    }

    /// Returns `true` when a data tree is held.
    pub fn is_data(&self) -> bool {
        matches!(self, SourceAst::Data(_))
    }

    /// Stores a recipe, replacing any prior content.
    pub fn set_recipe(&mut self, recipe: Recipe) {
        *self = SourceAst::Recipe(recipe);
    }

    /// Stores a data tree, replacing any prior content.
    pub fn set_data(&mut self, data: DataNode) {
        *self = SourceAst::Data(data);
    }

    /// Returns the held recipe.
    ///
    /// # Panics
    ///
    /// Panics when the holder does not contain a recipe.
    pub fn recipe(&self) -> &Recipe {
        match self {
            SourceAst::Recipe(recipe) => recipe,
            other => panic!("source holds {}, not a recipe", other.kind_name()),
        }
    }

    /// Returns the held data tree.
    ///
    /// # Panics
    ///
    /// Panics when the holder does not contain data.
    pub fn data(&self) -> &DataNode {
        match self {
            SourceAst::Data(data) => data,
            other => panic!("source holds {}, not data", other.kind_name()),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            SourceAst::Empty => "nothing",
            SourceAst::Recipe(_) => "a recipe",
            SourceAst::Data(_) => "data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_data_parser::{DataNode, DataNodeKind};
    use kiln_recipe_parser::StructDecl;
    use kiln_source::Span;

    fn recipe() -> Recipe {
        Recipe {
            includes: Vec::new(),
            root: StructDecl {
                name: None,
                generics: Vec::new(),
                items: Vec::new(),
                span: Span::DUMMY,
            },
            span: Span::DUMMY,
        }
    }

    #[test]
    fn starts_empty() {
        let ast = SourceAst::default();
        assert!(ast.is_empty());
        assert!(!ast.is_recipe());
        assert!(!ast.is_data());
    }

    #[test]
    fn exactly_one_kind_after_set() {
        let mut ast = SourceAst::default();
        ast.set_recipe(recipe());
        assert!(ast.is_recipe() && !ast.is_data());
        ast.set_data(DataNode::synthetic(DataNodeKind::Int(1)));
        assert!(ast.is_data() && !ast.is_recipe());
    }

    #[test]
    fn matching_accessor_works() {
        let mut ast = SourceAst::default();
        ast.set_data(DataNode::synthetic(DataNodeKind::Int(7)));
        assert_eq!(ast.data().kind, DataNodeKind::Int(7));
    }

    #[test]
    #[should_panic(expected = "not a recipe")]
    fn wrong_accessor_panics() {
        let mut ast = SourceAst::default();
        ast.set_data(DataNode::synthetic(DataNodeKind::Int(1)));
        ast.recipe();
    }

    #[test]
    #[should_panic(expected = "not data")]
    fn empty_accessor_panics() {
        let ast = SourceAst::default();
        ast.data();
    }
}
