use janitor_protocol::{AssetKind, AssetRecord, MissingScaleReport, EXPECTED_SCALES};

/// Scales from `1x`/`2x`/`3x` an image set does not declare, or `None` when it
/// declares all of them or is not an image set.
pub fn check_missing_scales(asset: &AssetRecord) -> Option<MissingScaleReport> {
    if asset.kind != AssetKind::ImageSet {
        return None;
    }

    let missing_scales: Vec<String> = EXPECTED_SCALES
        .iter()
        .filter(|scale| !asset.scales.contains_key(**scale))
        .map(|scale| scale.to_string())
        .collect();
    if missing_scales.is_empty() {
        return None;
    }

    Some(MissingScaleReport {
        asset: asset.clone(),
        missing_scales,
    })
}

/// Reports for every image set in `assets` with a gap.
pub fn find_missing_scales<'a>(
    assets: impl IntoIterator<Item = &'a AssetRecord>,
) -> Vec<MissingScaleReport> {
    assets.into_iter().filter_map(check_missing_scales).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use janitor_protocol::AssetMetadata;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn asset(kind: AssetKind, scales: &[&str]) -> AssetRecord {
        AssetRecord {
            name: "icon".to_string(),
            kind,
            catalog_path: PathBuf::from("/p/Assets.xcassets"),
            path: PathBuf::from("/p/Assets.xcassets/icon.imageset"),
            scales: scales
                .iter()
                .map(|s| (s.to_string(), PathBuf::from(format!("/p/icon@{s}.png"))))
                .collect::<BTreeMap<_, _>>(),
            metadata: AssetMetadata::default(),
            last_modified: None,
        }
    }

    #[test]
    fn only_two_x_is_missing_one_and_three() {
        let report = check_missing_scales(&asset(AssetKind::ImageSet, &["2x"])).unwrap();
        assert_eq!(report.missing_scales, vec!["1x", "3x"]);
    }

    #[test]
    fn complete_sets_and_other_kinds_have_no_report() {
        assert!(check_missing_scales(&asset(AssetKind::ImageSet, &["1x", "2x", "3x"])).is_none());
        assert!(check_missing_scales(&asset(AssetKind::AppIconSet, &["60x60@2x"])).is_none());
        assert!(check_missing_scales(&asset(AssetKind::ColorSet, &[])).is_none());
    }

    #[test]
    fn idiom_prefixed_keys_do_not_count() {
        let report =
            check_missing_scales(&asset(AssetKind::ImageSet, &["1x", "ipad-2x", "3x"])).unwrap();
        assert_eq!(report.missing_scales, vec!["2x"]);
    }

    #[test]
    fn batch_check_keeps_only_gaps() {
        let assets = vec![
            asset(AssetKind::ImageSet, &["1x", "2x", "3x"]),
            asset(AssetKind::ImageSet, &[]),
        ];
        let reports = find_missing_scales(&assets);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].missing_scales, vec!["1x", "2x", "3x"]);
    }
}
