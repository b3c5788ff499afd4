use egui::{epaint::TextShape, Align2, Color32, FontId, Pos2, Sense, Stroke, Vec2};

use crate::{
    app::{events::EventQueue, events::SelectXAxis, EguiApp},
    chart::{
        AxisField, LabelState, MARGIN, MARK_OPACITY, MARK_RADIUS, PLOT_HEIGHT,
        PLOT_WIDTH, SVG_HEIGHT, SVG_WIDTH, Y_AXIS_TITLE,
    },
};

const TICK_SIZE: f32 = 6.0;
const TICK_FONT_SIZE: f32 = 10.0;
const LABEL_FONT_SIZE: f32 = 14.0;

impl super::Scatter {
    pub fn render(
        &self,
        event_queue: &mut EventQueue<EguiApp>,
        now: f64,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
    ) {
        let Some(chart) = self.chart() else {
            if !self.dataset.is_up_to_date() {
                ui.spinner();
            }
            return;
        };

        let (response, painter) =
            ui.allocate_painter(Vec2::new(SVG_WIDTH as f32, SVG_HEIGHT as f32), Sense::hover());
        let origin = response.rect.min + Vec2::new(MARGIN.left as f32, MARGIN.top as f32);
        // Plot coordinates to screen coordinates.
        let to_screen = |x: f64, y: f64| origin + Vec2::new(x as f32, y as f32);

        let text_color = ui.visuals().text_color();
        let strong_color = ui.visuals().strong_text_color();
        let stroke = Stroke::new(1.0, text_color);
        let tick_font = FontId::proportional(TICK_FONT_SIZE);

        // Domain lines.
        let bottom_left = to_screen(0.0, PLOT_HEIGHT);
        painter.line_segment([bottom_left, to_screen(PLOT_WIDTH, PLOT_HEIGHT)], stroke);
        painter.line_segment([bottom_left, to_screen(0.0, 0.0)], stroke);

        for tick in chart.x_axis().tick_marks(now) {
            if !tick.position.is_finite() {
                continue;
            }
            let color = text_color.gamma_multiply(tick.opacity as f32);
            let top = to_screen(tick.position, PLOT_HEIGHT);
            painter.line_segment(
                [top, top + Vec2::new(0.0, TICK_SIZE)],
                Stroke::new(1.0, color),
            );
            painter.text(
                top + Vec2::new(0.0, TICK_SIZE + 2.0),
                Align2::CENTER_TOP,
                &tick.label,
                tick_font.clone(),
                color,
            );
        }

        for tick in chart.y_axis().tick_marks(now) {
            if !tick.position.is_finite() {
                continue;
            }
            let color = text_color.gamma_multiply(tick.opacity as f32);
            let right = to_screen(0.0, tick.position);
            painter.line_segment(
                [right - Vec2::new(TICK_SIZE, 0.0), right],
                Stroke::new(1.0, color),
            );
            painter.text(
                right - Vec2::new(TICK_SIZE + 3.0, 0.0),
                Align2::RIGHT_CENTER,
                &tick.label,
                tick_font.clone(),
                color,
            );
        }

        // Circles first, so every abbreviation is drawn on top.
        let fill = Color32::from_rgba_unmultiplied(0, 0, 255, (255.0 * MARK_OPACITY) as u8);
        let centers: Vec<Option<Pos2>> = chart
            .marks()
            .iter()
            .map(|mark| {
                let (x, y) = (mark.x_at(now), mark.y());
                (x.is_finite() && y.is_finite()).then(|| to_screen(x, y))
            })
            .collect();
        for center in centers.iter().flatten() {
            painter.circle_filled(*center, MARK_RADIUS as f32, fill);
        }
        for (mark, center) in chart.marks().iter().zip(centers.iter()) {
            if let Some(center) = center {
                painter.text(
                    *center,
                    Align2::CENTER_CENTER,
                    &mark.abbr,
                    tick_font.clone(),
                    Color32::WHITE,
                );
            }
        }

        // Rotated y-axis title, left of the tick labels.
        let galley = painter.layout_no_wrap(
            Y_AXIS_TITLE.to_string(),
            FontId::proportional(LABEL_FONT_SIZE),
            text_color,
        );
        let title_pos = to_screen(-24.0, PLOT_HEIGHT / 2.0)
            + Vec2::new(-galley.size().y / 2.0, galley.size().x / 2.0);
        painter.add(
            TextShape::new(title_pos, galley, text_color)
                .with_angle(-std::f32::consts::FRAC_PI_2),
        );

        // Selectable x-axis labels.
        for (i, field) in AxisField::ALL.into_iter().enumerate() {
            let color = match chart.label_state(field) {
                LabelState::Active => strong_color,
                LabelState::Inactive => Color32::GRAY,
            };
            let rect = painter.text(
                to_screen(PLOT_WIDTH / 2.0, PLOT_HEIGHT + 40.0 + 20.0 * i as f64),
                Align2::CENTER_CENTER,
                field.label(),
                FontId::proportional(LABEL_FONT_SIZE),
                color,
            );
            let label_response = ui
                .interact(rect, ui.id().with(("x_label", field.key())), Sense::click())
                .on_hover_cursor(egui::CursorIcon::PointingHand);
            if label_response.clicked() {
                log::debug!("x label '{}' clicked", field.label());
                event_queue.queue_event(Box::new(SelectXAxis::new(field, now)));
            }
        }

        // Tooltip of the mark under the pointer.
        if let Some(pos) = response.hover_pos() {
            let plot_pos = pos - origin;
            if let Some(lines) = chart
                .mark_at([plot_pos.x as f64, plot_pos.y as f64], now)
                .and_then(|index| chart.tooltip_lines(index))
            {
                response.on_hover_ui_at_pointer(|ui| {
                    for line in lines {
                        ui.label(line);
                    }
                });
            }
        }

        if chart.is_animating(now) {
            ctx.request_repaint();
        }
    }
}
