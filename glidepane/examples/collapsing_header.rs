use glidepane::{
    CollapsingHeaderState, HeaderOptions, NestedScrollConnection, NestedScrollSource, Offset,
    Velocity, fraction_between, lerp,
};

fn main() {
    // Example: a header collapsing from 240 to 64 as the body below it scrolls.
    //
    // A UI layer would:
    // - feed scroll deltas through the nested scroll hooks
    // - report the end of a fling
    // - tick the header each frame while it settles
    // - place the header and body from offset/progress
    let mut header = CollapsingHeaderState::new(
        HeaderOptions::new(64.0, 240.0)
            .with_snap_threshold(0.3)
            .with_on_change(Some(|h: &CollapsingHeaderState| {
                let title_size = lerp(28.0f32, 18.0, h.progress());
                let subtitle_alpha = 1.0 - fraction_between(h.progress(), 0.0, 0.4);
                println!(
                    "height={:.1} progress={:.3} title={title_size:.1} alpha={subtitle_alpha:.2}",
                    h.offset(),
                    h.progress()
                );
            })),
    );

    // Finger drags the body up by 150 in a few steps.
    for _ in 0..5 {
        header.on_pre_scroll(Offset::new(0.0, -30.0), NestedScrollSource::Drag);
    }

    // Released without velocity: past 1 - threshold, so the header snaps shut.
    let out = header.on_post_fling(Velocity::ZERO, Velocity::ZERO, 0);
    let Some(handle) = out.animation else {
        println!("no snap");
        return;
    };

    let mut now_ms = 0u64;
    while header.is_settling() {
        now_ms += 16;
        header.tick(now_ms);
    }
    println!("settled at t={now_ms} status={:?}", handle.status());
}
