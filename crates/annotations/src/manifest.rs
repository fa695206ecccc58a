use crate::model::{Annotation, PartOf, SourceResource};

pub const MANIFEST_TYPE: &str = "Manifest";

/// Find the manifest a source image belongs to.
///
/// Walks the `partOf` tree level by level until no level is left. A manifest
/// found deeper in the tree replaces one found higher up; within one level the
/// last entry in document order wins.
pub fn find_manifest(source: &SourceResource) -> Option<&str> {
    let mut found = None;
    let mut level: Vec<&PartOf> = source.part_of.iter().collect();

    while !level.is_empty() {
        let mut next: Vec<&PartOf> = Vec::new();
        for entry in level {
            if entry.kind.as_deref() == Some(MANIFEST_TYPE) {
                if let Some(id) = entry.id.as_deref() {
                    found = Some(id);
                }
            }
            next.extend(entry.part_of.iter());
        }
        level = next;
    }

    found
}

/// Set `annotation.manifest` from its source's `partOf` chain. Leaves the
/// field untouched when no manifest is found.
pub fn attach_manifest(annotation: &mut Annotation) {
    let manifest = annotation
        .source()
        .and_then(find_manifest)
        .map(str::to_string);
    if manifest.is_some() {
        annotation.manifest = manifest;
    }
}

pub fn attach_manifests(items: &mut [Annotation]) {
    for item in items {
        attach_manifest(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Target;

    fn part(kind: &str, id: &str, part_of: Vec<PartOf>) -> PartOf {
        PartOf {
            id: Some(id.to_string()),
            kind: Some(kind.to_string()),
            part_of,
        }
    }

    fn annotation_with(part_of: Vec<PartOf>) -> Annotation {
        Annotation {
            id: "https://annotations.allmaps.org/maps/abc".to_string(),
            target: Some(Target {
                source: Some(SourceResource {
                    id: Some("img".to_string()),
                    kind: Some("ImageService3".to_string()),
                    part_of,
                }),
            }),
            body: None,
            manifest: None,
        }
    }

    #[test]
    fn finds_manifest_two_levels_down() {
        let mut a = annotation_with(vec![part(
            "Canvas",
            "canvas-1",
            vec![part("Manifest", "X", vec![])],
        )]);
        attach_manifest(&mut a);
        assert_eq!(a.manifest.as_deref(), Some("X"));
    }

    #[test]
    fn no_part_of_chain_leaves_manifest_unset() {
        let mut a = annotation_with(vec![]);
        attach_manifest(&mut a);
        assert_eq!(a.manifest, None);

        let mut bare = annotation_with(vec![]);
        bare.target = None;
        attach_manifest(&mut bare);
        assert_eq!(bare.manifest, None);
    }

    #[test]
    fn walks_deeper_than_two_levels() {
        let mut a = annotation_with(vec![part(
            "Canvas",
            "c",
            vec![part(
                "Range",
                "r",
                vec![part("Manifest", "deep", vec![])],
            )],
        )]);
        attach_manifest(&mut a);
        assert_eq!(a.manifest.as_deref(), Some("deep"));
    }

    #[test]
    fn deeper_manifest_wins_over_shallower() {
        let a = annotation_with(vec![
            part("Manifest", "shallow", vec![]),
            part("Canvas", "c", vec![part("Manifest", "outer", vec![])]),
        ]);
        assert_eq!(find_manifest(a.source().unwrap()), Some("outer"));
    }

    #[test]
    fn non_manifest_entries_are_ignored() {
        let a = annotation_with(vec![part(
            "Canvas",
            "c",
            vec![part("Collection", "col", vec![])],
        )]);
        assert_eq!(find_manifest(a.source().unwrap()), None);
    }
}
