use super::*;

#[test]
fn formats_with_three_digit_padding() {
    assert_eq!(format_scene_name("char_model", 7, "ma"), "char_model_v007.ma");
    assert_eq!(format_scene_name("main", 1, "ma"), "main_v001.ma");
    assert_eq!(format_scene_name("shot", 999, "mb"), "shot_v999.mb");
}

#[test]
fn wide_versions_are_not_truncated() {
    assert_eq!(format_scene_name("shot", 1000, "ma"), "shot_v1000.ma");
    assert_eq!(format_scene_name("shot", 123456, "ma"), "shot_v123456.ma");
}

#[test]
fn parses_canonical_name() {
    let name = parse_scene_name("char_v012.ma").expect("canonical name should parse");
    assert_eq!(name.descriptor, "char");
    assert_eq!(name.version, 12);
    assert_eq!(name.extension, "ma");
}

#[test]
fn descriptor_may_contain_underscores() {
    let name = parse_scene_name("char_model_v007.ma").expect("parse");
    assert_eq!(name.descriptor, "char_model");
    assert_eq!(name.version, 7);
}

#[test]
fn round_trips_across_version_range() {
    for (descriptor, extension) in [("main", "ma"), ("env_forest", "mb"), ("x", "usd")] {
        for version in [1, 2, 9, 10, 99, 100, 500, 999, 1000, 4242] {
            let rendered = format_scene_name(descriptor, version, extension);
            let parsed = parse_scene_name(&rendered).expect("rendered name must parse");
            assert_eq!(
                parsed,
                SceneName::new(descriptor, version, extension).expect("valid fields")
            );
        }
    }
}

#[test]
fn display_and_from_str_agree() {
    let name = SceneName::new("prop", 3, "ma").expect("valid fields");
    let rendered = name.to_string();
    assert_eq!(rendered, "prop_v003.ma");
    let reparsed: SceneName = rendered.parse().expect("display output parses");
    assert_eq!(reparsed, name);
}

#[test]
fn accepts_unpadded_numeral() {
    let name = parse_scene_name("foo_v7.ma").expect("unpadded numeral is still a version");
    assert_eq!(name.version, 7);
}

#[test]
fn rejects_names_without_delimiters() {
    for bad in ["readme.txt", "foo_v001", "foo001.ma", "", "notes"] {
        let err = parse_scene_name(bad).expect_err("name without delimiters must fail");
        assert!(
            matches!(err, SceneNameError::Malformed { .. }),
            "{bad:?} gave {err:?}"
        );
    }
}

#[test]
fn rejects_repeated_delimiters() {
    for bad in ["a_vb_v001.ma", "foo_v001.ma.bak", "foo_v001..ma"] {
        let err = parse_scene_name(bad).expect_err("ambiguous name must fail");
        assert!(matches!(err, SceneNameError::Malformed { .. }), "{bad:?}");
    }
}

#[test]
fn rejects_empty_descriptor_or_extension() {
    assert!(matches!(
        parse_scene_name("_v001.ma"),
        Err(SceneNameError::Malformed { .. })
    ));
    assert!(matches!(
        parse_scene_name("foo_v001."),
        Err(SceneNameError::Malformed { .. })
    ));
}

#[test]
fn rejects_non_numeric_or_zero_version() {
    for bad in ["foo_vabc.ma", "foo_v.ma", "foo_v+01.ma", "foo_v-1.ma", "foo_v000.ma"] {
        let err = parse_scene_name(bad).expect_err("bad version must fail");
        assert!(
            matches!(err, SceneNameError::InvalidVersion { .. }),
            "{bad:?} gave {err:?}"
        );
    }
}

#[test]
fn rejects_version_beyond_u32() {
    let err = parse_scene_name("foo_v99999999999.ma").expect_err("overflowing version");
    assert_eq!(
        err,
        SceneNameError::InvalidVersion {
            name: "foo_v99999999999.ma".to_string(),
            segment: "99999999999".to_string(),
        }
    );
}

#[test]
fn field_validation() {
    assert!(validate_descriptor("char_model").is_ok());
    assert!(validate_descriptor("").is_err());
    assert!(validate_descriptor("env_village").is_err());
    assert!(validate_descriptor("a.b").is_err());
    assert!(validate_descriptor("a/b").is_err());

    assert!(validate_extension("ma").is_ok());
    assert!(validate_extension(".ma").is_err());
    assert!(validate_extension("").is_err());
    assert!(validate_extension("tar.gz").is_err());

    assert_eq!(validate_version(0), Err(FieldError::ZeroVersion));
    assert!(validate_version(1).is_ok());
}
