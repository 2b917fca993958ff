use glidepane::{Orientation, Size, SplitLayoutState, SplitOptions};

fn main() {
    // Example: three panes side by side, each at least 120 wide.
    let mut split = SplitLayoutState::new(
        SplitOptions::new(3)
            .with_orientation(Orientation::Horizontal)
            .with_min_size(120.0),
    );
    split.set_layout_size(Size::new(900.0, 600.0));

    let print = |split: &SplitLayoutState| {
        let sizes: Vec<String> = (0..split.visible_count())
            .map(|i| format!("{:.1}", split.pane_size(i)))
            .collect();
        let mut separators = Vec::new();
        split.for_each_separator(|_, off| separators.push(format!("{off:.1}")));
        println!("sizes=[{}] separators=[{}]", sizes.join(", "), separators.join(", "));
    };
    print(&split);

    // Drag the first separator right in 40px steps until the layout refuses.
    for step in 0..10 {
        if !split.drag_by(0, 40.0) {
            println!("step {step}: blocked");
            break;
        }
        print(&split);
    }

    // Hide the last pane; its weight is kept for when it comes back.
    split.set_visible_count(2);
    print(&split);
    split.set_visible_count(3);
    print(&split);

    let saved = split.save();
    println!("saved weights={:?}", saved.weights);
}
