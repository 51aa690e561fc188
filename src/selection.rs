//! selection sets
//!
//! groups flat dotted paths back into nested graphql selections.

/// group dotted paths into selection entries
///
/// paths without a dot come first, in input order. dotted paths are grouped
/// under their first segment, groups ordered by first appearance, and render
/// as `parent { child ... }`; deeper paths group recursively. duplicates are
/// dropped.
pub fn build_selections<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    let mut roots: Vec<&str> = Vec::new();
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();

    for path in paths {
        match path.as_ref().split_once('.') {
            None => {
                let root = path.as_ref();
                if !roots.contains(&root) {
                    roots.push(root);
                }
            }
            Some((parent, child)) => match groups.iter_mut().find(|(name, _)| *name == parent) {
                Some((_, children)) => children.push(child),
                None => groups.push((parent, vec![child])),
            },
        }
    }

    let mut out: Vec<String> = roots.into_iter().map(str::to_string).collect();
    for (parent, children) in groups {
        out.push(format!("{} {{ {} }}", parent, build_selections(&children).join(" ")));
    }
    out
}

/// a full selection body `{ a b c { d } }`
pub(crate) fn selection_block<S: AsRef<str>>(paths: &[S]) -> String {
    format!("{{ {} }}", build_selections(paths).join(" "))
}
