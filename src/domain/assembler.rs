//! Builds one variant from a template and an assignment.

use crate::domain::combiner::Assignment;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::template::Template;
use crate::domain::tree::{Position, Tree};

/// Deep-copy the template and splice each assigned candidate in at its
/// position.
///
/// Positions are resolved against the template's index, never the copy, so
/// the order of splices does not matter as long as the assignment is an
/// antichain. `None` entries leave the template node in place. The template
/// itself is not touched.
pub fn assemble(template: &Template, assignment: &Assignment<'_>) -> DomainResult<Tree> {
    let mut variant = template.tree().clone();
    for (position, candidate) in assignment.replacements() {
        splice(template, &mut variant, position, candidate)?;
    }
    Ok(variant)
}

fn splice(
    template: &Template,
    variant: &mut Tree,
    position: Position,
    candidate: &Tree,
) -> DomainResult<()> {
    let out_of_range = || DomainError::PositionOutOfRange {
        position,
        len: template.len(),
    };
    let path = template.arena().path_to(position).ok_or_else(out_of_range)?;

    let Some((&slot, parents)) = path.split_last() else {
        *variant = candidate.clone();
        return Ok(());
    };
    let mut node = variant;
    for &offset in parents {
        node = node
            .children_mut()
            .get_mut(offset)
            .ok_or_else(out_of_range)?;
    }
    let target = node.children_mut().get_mut(slot).ok_or_else(out_of_range)?;
    *target = candidate.clone();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(text: &str) -> Tree {
        text.parse().unwrap()
    }

    fn template() -> Template {
        Template::new(tree("(S (NP (PRP he)) (VP (VBZ is) (NP (DT a) (NN fool))))"))
    }

    #[test]
    fn given_single_replacement_when_assembling_then_only_that_subtree_changes() {
        let template = template();
        let genius = tree("(NP (DT a) (NN genius))");
        let assignment = Assignment::new().with(Position(7), Some(&genius));

        let variant = assemble(&template, &assignment).unwrap();

        assert_eq!(
            variant.to_string(),
            "(S (NP (PRP he)) (VP (VBZ is) (NP (DT a) (NN genius))))"
        );
        assert_eq!(template.tree().sentence(), "he is a fool");
    }

    #[test]
    fn given_root_position_when_assembling_then_candidate_replaces_whole_tree() {
        let template = template();
        let other = tree("(S (NP (NNS cats)) (VP (VBP purr)))");
        let assignment = Assignment::new().with(Position(0), Some(&other));

        assert_eq!(assemble(&template, &assignment).unwrap(), other);
    }

    #[test]
    fn given_placeholder_entry_when_assembling_then_node_is_kept() {
        let template = template();
        let cats = tree("(NP (NNS cats))");
        let assignment = Assignment::new()
            .with(Position(1), Some(&cats))
            .with(Position(7), None);

        let variant = assemble(&template, &assignment).unwrap();
        assert_eq!(variant.sentence(), "cats is a fool");
    }

    #[test]
    fn given_empty_assignment_when_assembling_then_returns_copy_of_template() {
        let template = template();
        let variant = assemble(&template, &Assignment::new()).unwrap();
        assert_eq!(&variant, template.tree());
    }

    #[test]
    fn given_position_past_end_when_assembling_then_fails() {
        let template = template();
        let cats = tree("(NP (NNS cats))");
        let assignment = Assignment::new().with(Position(12), Some(&cats));

        let err = assemble(&template, &assignment).unwrap_err();
        assert_eq!(
            err,
            DomainError::PositionOutOfRange {
                position: Position(12),
                len: 12
            }
        );
    }
}
