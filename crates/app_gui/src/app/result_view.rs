//! Detection result box.

use eframe::egui;
use leaf_core::PredictionResult;

const RESULT_GREEN: egui::Color32 = egui::Color32::from_rgb(0x2e, 0xcc, 0x71);

pub(super) fn render(ui: &mut egui::Ui, result: &PredictionResult) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(20))
        .corner_radius(12.0)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("Detection Result:").size(16.0).weak());
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(result.display_label())
                        .size(24.0)
                        .strong()
                        .color(RESULT_GREEN),
                );
                ui.add_space(12.0);
                ui.label(
                    egui::RichText::new(format!("Confidence: {}", result.confidence_percent()))
                        .size(18.0),
                );
                ui.add_space(8.0);
                ui.add(
                    egui::ProgressBar::new(result.bar_fraction())
                        .fill(RESULT_GREEN)
                        .desired_height(10.0),
                );
            });
        });
}
