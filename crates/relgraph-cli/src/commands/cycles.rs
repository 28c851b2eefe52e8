//! Handler for `relgraph cycles`.

use std::collections::BTreeSet;

use miette::Result;

use relgraph_core::config::GlobalConfig;
use relgraph_ops::{ops_cycles, parse_projects, FilterOptions, GraphSource};
use relgraph_traverse::{CancellationToken, Completion, Cycle};

pub fn exec(
    config: &GlobalConfig,
    roots: &[String],
    source: GraphSource,
    filter: FilterOptions,
) -> Result<()> {
    let roots = parse_projects(roots)?;
    let cycles = ops_cycles::cycles(config, &source, &roots, &filter, &CancellationToken::new())?;
    print!("{}", report(&cycles));
    Ok(())
}

fn report(cycles: &Completion<BTreeSet<Cycle>>) -> String {
    let found = cycles.value();
    let mut out = if found.is_empty() {
        "No cycles.\n".to_string()
    } else {
        let mut text = format!("Cycles ({}):\n", found.len());
        for cycle in found {
            text.push_str(&format!("  {cycle}\n"));
        }
        text
    };
    if !cycles.is_complete() {
        out.push_str("(incomplete: traversal was cancelled)\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgraph_core::coordinate::ProjectVersionRef;
    use relgraph_core::relationship::Relationship;

    fn self_parent() -> BTreeSet<Cycle> {
        let root = ProjectVersionRef::parse("g:root:1").unwrap();
        let rel = Relationship::parent(root.clone(), root);
        BTreeSet::from([Cycle::from_edges(vec![rel])])
    }

    #[test]
    fn complete_report_has_no_tag() {
        let text = report(&Completion::Complete(self_parent()));
        assert_eq!(text, "Cycles (1):\n  g:root -> g:root\n");
    }

    #[test]
    fn cancelled_report_is_tagged() {
        let text = report(&Completion::Cancelled(BTreeSet::new()));
        assert_eq!(text, "No cycles.\n(incomplete: traversal was cancelled)\n");

        let text = report(&Completion::Cancelled(self_parent()));
        assert!(text.starts_with("Cycles (1):\n"));
        assert!(text.ends_with("(incomplete: traversal was cancelled)\n"));
    }
}
