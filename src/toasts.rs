use std::time::Duration;

use egui::{Align2, Direction, WidgetText};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};

/// Toast area in the bottom right corner, newest at the bottom.
pub fn area() -> Toasts {
    Toasts::new()
        .anchor(Align2::RIGHT_BOTTOM, (-10.0, -10.0))
        .direction(Direction::BottomUp)
}

pub fn notify<I>(toasts: &mut Toasts, kind: ToastKind, message: I)
where
    I: Into<WidgetText>,
{
    toasts.add(Toast {
        text: message.into(),
        kind,
        options: ToastOptions::default()
            .duration(Duration::from_secs(5))
            .show_progress(true),
        ..Default::default()
    });
}
