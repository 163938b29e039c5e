use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::figure::{CurrentValue, MenuButton, Pad, Slider, SliderStep, UpdateMenu};

const PLAY_DURATION_MS: u32 = 500;

/// Group rows by year, ascending. Each group keeps the input order.
pub fn group_by_year<T, F>(rows: &[T], year: F) -> BTreeMap<i32, Vec<&T>>
where
    F: Fn(&T) -> i32,
{
    let mut groups: BTreeMap<i32, Vec<&T>> = BTreeMap::new();
    for row in rows {
        groups.entry(year(row)).or_default().push(row);
    }
    groups
}

fn animate_options(duration: u32, redraw: bool) -> Value {
    json!({
        "frame": { "duration": duration, "redraw": redraw },
        "mode": "immediate",
        "fromcurrent": true,
        "transition": { "duration": duration, "easing": "linear" }
    })
}

/// Year slider plus play/pause buttons driving the named frames.
///
/// `redraw` must be true for geo traces, which cannot be transitioned in place.
pub fn year_controls(frame_names: &[String], redraw: bool) -> (Vec<Slider>, Vec<UpdateMenu>) {
    if frame_names.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let steps = frame_names
        .iter()
        .map(|name| SliderStep {
            label: name.clone(),
            method: "animate".into(),
            args: json!([[name], animate_options(0, redraw)]),
        })
        .collect();

    let slider = Slider {
        active: 0,
        currentvalue: CurrentValue {
            prefix: "Year=".into(),
        },
        len: 0.9,
        x: 0.1,
        xanchor: "left".into(),
        y: 0.0,
        yanchor: "top".into(),
        pad: Pad {
            b: Some(10),
            t: Some(60),
            r: None,
        },
        steps,
    };

    let menu = UpdateMenu {
        kind: "buttons".into(),
        direction: "left".into(),
        showactive: false,
        x: 0.1,
        xanchor: "right".into(),
        y: 0.0,
        yanchor: "top".into(),
        pad: Pad {
            b: None,
            r: Some(10),
            t: Some(70),
        },
        buttons: vec![
            MenuButton {
                label: "▶".into(),
                method: "animate".into(),
                args: json!([null, animate_options(PLAY_DURATION_MS, redraw)]),
            },
            MenuButton {
                label: "◼".into(),
                method: "animate".into(),
                args: json!([[null], animate_options(0, redraw)]),
            },
        ],
    };

    (vec![slider], vec![menu])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_ascend_by_year() {
        let rows = [(2021, "b"), (1990, "a"), (2021, "c")];
        let groups = group_by_year(&rows, |r| r.0);

        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), [1990, 2021]);
        assert_eq!(groups[&2021].iter().map(|r| r.1).collect::<Vec<_>>(), ["b", "c"]);
    }

    #[test]
    fn one_slider_step_per_frame() {
        let names = vec!["1990".to_string(), "1991".to_string()];
        let (sliders, menus) = year_controls(&names, true);

        assert_eq!(sliders.len(), 1);
        let labels: Vec<_> = sliders[0].steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["1990", "1991"]);
        assert_eq!(sliders[0].steps[1].args[0][0], "1991");
        assert_eq!(menus[0].buttons.len(), 2);
    }

    #[test]
    fn no_frames_no_controls() {
        let (sliders, menus) = year_controls(&[], false);
        assert!(sliders.is_empty());
        assert!(menus.is_empty());
    }
}
