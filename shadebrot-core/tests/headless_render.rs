use shadebrot_core::{Complex, FrameParams, Preset, Session};

/// Evaluate every pixel of a frame and collect the counts into a flat Vec.
fn render_grid(frame: &FrameParams) -> Vec<u32> {
    let mut counts = Vec::with_capacity((frame.width * frame.height) as usize);
    for py in 0..frame.height {
        for px in 0..frame.width {
            counts.push(frame.escape.evaluate(frame.pixel_to_plane(px, py)));
        }
    }
    counts
}

#[test]
fn default_view_centers_on_the_main_cardioid() {
    let session = Session::new(Preset::standard(), 1280, 720).unwrap();
    let c = session.viewport().sample_to_plane(0.0, 0.0);
    assert!((c.re + 0.5).abs() < 1e-12);
    assert!(c.im.abs() < 1e-12);
    assert_eq!(session.escape_time().evaluate(c), 150);
}

#[test]
fn every_preset_renders_both_regions() {
    for preset in Preset::builtins() {
        let name = preset.name.clone();
        let max = preset.max_iterations;
        let session = Session::new(preset, 96, 64).unwrap();
        let counts = render_grid(&session.frame_params());

        assert_eq!(counts.len(), 96 * 64);
        let interior = counts.iter().filter(|&&n| n == max).count();
        let escaped = counts.iter().filter(|&&n| n < max).count();
        assert!(interior > 0, "{name}: should have some interior points");
        assert!(escaped > 0, "{name}: should have some escaped points");
        assert_eq!(interior + escaped, counts.len());
    }
}

#[test]
fn headless_render_is_deterministic() {
    let session = Session::new(Preset::classic(), 80, 60).unwrap();
    let run1 = render_grid(&session.frame_params());
    let run2 = render_grid(&session.frame_params());
    assert_eq!(run1, run2, "two identical renders must produce identical results");
}

#[test]
fn zoomed_frame_shows_a_smaller_region() {
    let mut session = Session::new(Preset::deep(), 64, 36).unwrap();
    let wide = session.frame_params();
    for _ in 0..5 {
        session.zoom_in();
    }
    let narrow = session.frame_params();
    let span = |f: &FrameParams| {
        let a = f.pixel_to_plane(0, 0);
        let b = f.pixel_to_plane(f.width - 1, 0);
        (b.re - a.re).abs()
    };
    assert!(span(&narrow) < span(&wide));
}

#[test]
fn pan_then_reset_restores_the_first_frame() {
    let mut session = Session::new(Preset::square(), 50, 50).unwrap();
    let first = render_grid(&session.frame_params());

    session.begin_drag(10.0, 10.0);
    session.drag_to(30.0, 25.0);
    session.end_drag();
    assert_ne!(session.viewport().offset, Complex::ZERO);
    assert_ne!(render_grid(&session.frame_params()), first);

    session.reset();
    assert_eq!(render_grid(&session.frame_params()), first);
}
