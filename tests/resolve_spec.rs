use placard::{ResolverState, SpecEdit, Style, TextAnchor, classify_aspect_ratio, resolve};

#[test]
fn classify_matches_known_ratios() {
    assert_eq!(classify_aspect_ratio(1920, 1080), "16:9");
    assert_eq!(classify_aspect_ratio(800, 600), "4:3");
    assert_eq!(classify_aspect_ratio(500, 300), "5:3");
}

#[test]
fn aspect_selection_recomputes_height_holding_width() {
    let base = ResolverState::default();
    assert_eq!(base.spec.width, 800);

    let square = resolve(&base, &SpecEdit::AspectRatio("1:1".to_string()));
    assert_eq!(square.spec.width, 800);
    assert_eq!(square.spec.height, 800);
    assert_eq!(square.resolution_label, "Custom");
    assert_eq!(square.aspect_label, "1:1");

    let mut wide = base.clone();
    wide.spec.width = 1080;
    let story = resolve(&wide, &SpecEdit::AspectRatio("9:16".to_string()));
    assert_eq!(story.spec.height, 1920);
}

#[test]
fn custom_aspect_selection_recomputes_nothing() {
    let base = ResolverState::default();
    let next = resolve(&base, &SpecEdit::AspectRatio("Custom".to_string()));
    assert_eq!(next.spec.width, base.spec.width);
    assert_eq!(next.spec.height, base.spec.height);
    assert_eq!(next.resolution_label, "Custom");
}

#[test]
fn preset_selection_sets_dimensions_and_both_labels() {
    let base = ResolverState::default();
    let next = resolve(
        &base,
        &SpecEdit::Resolution("Full HD (1920×1080)".to_string()),
    );
    assert_eq!(next.spec.width, 1920);
    assert_eq!(next.spec.height, 1080);
    assert_eq!(next.resolution_label, "Full HD (1920×1080)");
    assert_eq!(next.aspect_label, "16:9");
}

#[test]
fn preset_selection_without_canonical_ratio_keeps_custom_aspect() {
    let base = ResolverState::default();
    let next = resolve(&base, &SpecEdit::Resolution("Portrait (1080×1350)".to_string()));
    assert_eq!(next.spec.height, 1350);
    // 4:5 is not one of the five canonical entries.
    assert_eq!(next.aspect_label, "Custom");
    assert_eq!(next.spec.aspect_ratio_label(), "4:5");
}

#[test]
fn manual_dimension_edits_decouple_both_labels() {
    let base = ResolverState::default();
    let preset = resolve(&base, &SpecEdit::Resolution("HD (1280×720)".to_string()));
    assert_eq!(preset.aspect_label, "16:9");

    let next = resolve(&preset, &SpecEdit::Width("1000".to_string()));
    assert_eq!(next.spec.width, 1000);
    assert_eq!(next.spec.height, 720);
    assert_eq!(next.resolution_label, "Custom");
    assert_eq!(next.aspect_label, "Custom");
}

#[test]
fn malformed_dimension_input_coerces_to_one() {
    let base = ResolverState::default();
    let next = resolve(&base, &SpecEdit::Height("not-a-number".to_string()));
    assert_eq!(next.spec.height, 1);
    let next = resolve(&base, &SpecEdit::Height("-20".to_string()));
    assert_eq!(next.spec.height, 1);
}

#[test]
fn aspect_edit_forces_resolution_label_custom() {
    let base = ResolverState::default();
    let preset = resolve(&base, &SpecEdit::Resolution("4K (3840×2160)".to_string()));
    assert_eq!(preset.resolution_label, "4K (3840×2160)");

    let next = resolve(&preset, &SpecEdit::AspectRatio("4:3".to_string()));
    assert_eq!(next.resolution_label, "Custom");
    assert_eq!(next.spec.width, 3840);
    assert_eq!(next.spec.height, 2880);
}

#[test]
fn independent_field_edits_touch_only_their_field() {
    let base = ResolverState::default();
    let preset = resolve(&base, &SpecEdit::Resolution("Square (1080×1080)".to_string()));

    let next = resolve(&preset, &SpecEdit::OverlayText("hello".to_string()));
    assert_eq!(next.spec.overlay_text, "hello");
    assert_eq!(next.resolution_label, "Square (1080×1080)");
    assert_eq!(next.aspect_label, "1:1");
    assert_eq!(next.spec.width, 1080);

    let next = resolve(&next, &SpecEdit::Style("waves".to_string()));
    assert_eq!(next.spec.style, Style::Waves);
    assert_eq!(next.spec.overlay_text, "hello");

    let next = resolve(&next, &SpecEdit::TextPosition("bottom-right".to_string()));
    assert_eq!(next.spec.text_position, TextAnchor::BottomRight);
}

#[test]
fn unknown_names_fall_back_to_first_entries() {
    let base = ResolverState::default();
    let next = resolve(&base, &SpecEdit::Style("plasma".to_string()));
    assert_eq!(next.spec.style, Style::Solid);

    let next = resolve(&base, &SpecEdit::TextPosition("under".to_string()));
    assert_eq!(next.spec.text_position, TextAnchor::TopLeft);

    let next = resolve(&base, &SpecEdit::GradientPreset("nope".to_string()));
    assert_eq!(next.spec.gradient, placard::gradient_colors("dusk"));
}
