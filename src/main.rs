use anyhow::anyhow;
use chrono::Utc;
use eframe::egui;
use egui::{Color32, CornerRadius, RichText, ScrollArea, Stroke, Ui, ViewportBuilder};
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use hacker_stories::logging::init_logging;
use hacker_stories::models::filter_by_title;
use hacker_stories::{
    AppConfig, FetchPolicy, KeyValueStore, MemoryStore, SearchClient, SearchTermStore, SqliteStore, Story,
    StoryStore,
};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let _logger = init_logging(&config.log_level, &config.data_dir.join("logs"))?;

    let settings: Arc<dyn KeyValueStore> = match SqliteStore::open(&config.data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            // Keep working without persistence
            error!("Failed to open settings database: {}", e);
            Arc::new(MemoryStore::new())
        }
    };
    let client = SearchClient::new(config.request_timeout)?;

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Hacker Stories"),
        ..Default::default()
    };

    eframe::run_native(
        "Hacker Stories",
        options,
        Box::new(move |cc| {
            let mut app = HackerStoriesApp::new(&config, settings, client);

            if let Some(storage) = cc.storage {
                // Try to load saved theme preference
                if let Some(theme_str) = storage.get_string("is_dark_mode") {
                    if let Ok(is_dark_mode) = theme_str.parse::<bool>() {
                        app.set_dark_mode(is_dark_mode);
                    }
                }
            }

            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow!("Failed to run the UI: {}", e))
}

// Only the colors this UI reads; everything else comes from egui's visuals
struct AppTheme {
    is_dark: bool,
    background: Color32,
    card_background: Color32,
    text: Color32,
    secondary_text: Color32,
    highlight: Color32,
    error: Color32,
    separator: Color32,
    button_background: Color32,
    button_foreground: Color32,
}

impl AppTheme {
    fn dark() -> Self {
        Self {
            is_dark: true,
            background: Color32::from_rgb(18, 18, 18),
            card_background: Color32::from_rgb(30, 30, 30),
            text: Color32::from_rgb(240, 240, 240),
            secondary_text: Color32::from_rgb(170, 170, 170),
            highlight: Color32::from_rgb(255, 102, 0), // HN orange
            error: Color32::from_rgb(239, 83, 80),
            separator: Color32::from_rgb(60, 60, 60),
            button_background: Color32::from_rgb(60, 60, 60),
            button_foreground: Color32::from_rgb(240, 240, 240),
        }
    }

    fn light() -> Self {
        Self {
            is_dark: false,
            background: Color32::from_rgb(246, 246, 239),
            card_background: Color32::WHITE,
            text: Color32::from_rgb(20, 20, 20),
            secondary_text: Color32::from_rgb(100, 100, 100),
            highlight: Color32::from_rgb(235, 92, 0),
            error: Color32::from_rgb(198, 40, 40),
            separator: Color32::from_rgb(215, 215, 210),
            button_background: Color32::from_rgb(230, 230, 225),
            button_foreground: Color32::from_rgb(20, 20, 20),
        }
    }

    fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut visuals = if self.is_dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };

        visuals.panel_fill = self.background;
        visuals.extreme_bg_color = self.card_background;
        visuals.hyperlink_color = self.highlight;
        visuals.selection.bg_fill = self.highlight;
        visuals.selection.stroke = Stroke::new(1.0, self.highlight);
        visuals.widgets.inactive.weak_bg_fill = self.button_background;

        ctx.set_visuals(visuals);
    }

    // High scoring stories get the accent color
    fn points_color(&self, points: i32) -> Color32 {
        if points >= 100 {
            self.highlight
        } else {
            self.secondary_text
        }
    }
}

struct HackerStoriesApp {
    theme: AppTheme,
    endpoint: String,
    stories: StoryStore,
    policy: FetchPolicy<SearchClient>,
    search: SearchTermStore,
    // Text edit buffer, mirrored into `search` on change
    search_input: String,
    focus_search_input: bool,
    // Local title filter over the loaded stories
    show_filter_ui: bool,
    title_filter: String,
    // Pending actions to avoid borrow checker issues
    pending_dismiss: Option<Story>,
}

impl HackerStoriesApp {
    fn new(config: &AppConfig, settings: Arc<dyn KeyValueStore>, client: SearchClient) -> Self {
        let search = SearchTermStore::open(settings, &config.storage_key, &config.default_query);
        let policy = FetchPolicy::new(client).with_discard_stale(config.discard_stale_responses);

        let mut app = Self {
            theme: AppTheme::dark(),
            endpoint: config.endpoint.clone(),
            stories: StoryStore::new(),
            policy,
            search_input: search.term().to_string(),
            search,
            focus_search_input: true,
            show_filter_ui: false,
            title_filter: String::new(),
            pending_dismiss: None,
        };

        // Initial load with the persisted or default term
        let target = app.search.request_target(&app.endpoint);
        app.policy.request(target, &mut app.stories);
        app
    }

    fn set_dark_mode(&mut self, is_dark_mode: bool) {
        self.theme = if is_dark_mode {
            AppTheme::dark()
        } else {
            AppTheme::light()
        };
    }

    fn toggle_theme(&mut self) {
        self.set_dark_mode(!self.theme.is_dark);
    }

    fn on_search_changed(&mut self) {
        self.search.set_term(&self.search_input);
    }

    fn on_search_submitted(&mut self) {
        let target = self.search.submit(&self.endpoint);
        if !self.policy.request(target, &mut self.stories) {
            info!("Search for {:?} already loaded", self.search.submitted());
        }
    }

    fn refresh(&mut self) {
        if !self.policy.refresh(&mut self.stories) {
            warn!("Nothing to refresh yet");
        }
    }

    fn toggle_filter_ui(&mut self) {
        self.show_filter_ui = !self.show_filter_ui;
        if !self.show_filter_ui {
            self.title_filter.clear();
        }
    }

    fn open_link(&self, url: &str) {
        if let Err(e) = open::that(url) {
            error!("Failed to open URL {}: {}", url, e);
        }
    }

    fn process_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let (command, f_pressed, escape_pressed) = ctx.input(|i| {
            (
                i.modifiers.command,
                i.key_pressed(egui::Key::F),
                i.key_pressed(egui::Key::Escape),
            )
        });

        if command && f_pressed && !self.show_filter_ui {
            self.toggle_filter_ui();
        } else if escape_pressed && self.show_filter_ui {
            self.toggle_filter_ui();
        }
    }

    fn render_search_bar(&mut self, ui: &mut Ui) {
        let mut submitted = false;

        ui.horizontal(|ui| {
            ui.label(RichText::new("Search:").color(self.theme.text).size(16.0));
            ui.add_space(8.0);

            let input_id = egui::Id::new("search_input");
            let text_edit = ui.add_sized(
                [ui.available_width() - 100.0, 32.0],
                egui::TextEdit::singleline(&mut self.search_input)
                    .hint_text("Search Hacker News...")
                    .text_color(self.theme.text)
                    .id(input_id),
            );

            if self.focus_search_input {
                text_edit.request_focus();
                self.focus_search_input = false;
            }

            if text_edit.changed() {
                self.on_search_changed();
            }

            if text_edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submitted = true;
            }

            ui.add_space(8.0);
            let submit_btn = ui.add(
                egui::Button::new(
                    RichText::new("Submit")
                        .color(self.theme.button_foreground)
                        .size(14.0),
                )
                .min_size(egui::vec2(80.0, 30.0))
                .corner_radius(CornerRadius::same(6))
                .fill(self.theme.button_background),
            );
            if submit_btn.clicked() {
                submitted = true;
            }
        });

        if submitted {
            self.on_search_submitted();
        }
    }

    fn render_filter_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Filter:").color(self.theme.text).size(14.0));
            ui.add_space(8.0);
            ui.add_sized(
                [ui.available_width() - 200.0, 28.0],
                egui::TextEdit::singleline(&mut self.title_filter)
                    .hint_text("Filter loaded stories by title...")
                    .text_color(self.theme.text),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new("Press ESC to close filter")
                        .color(self.theme.secondary_text)
                        .size(13.0)
                        .italics(),
                );
            });
        });
    }

    fn render_status(&self, ui: &mut Ui) {
        let state = self.stories.state();

        if state.is_error {
            ui.label(
                RichText::new("Something went wrong while loading stories. Press ⟳ Refresh to retry.")
                    .color(self.theme.error)
                    .size(15.0),
            );
        }

        if state.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(
                    RichText::new("Loading...")
                        .color(self.theme.secondary_text)
                        .size(15.0),
                );
            });
        }
    }

    // Returns the story the user dismissed, if any
    fn render_story_list(&self, ui: &mut Ui) -> Option<Story> {
        let state = self.stories.state();
        let now = Utc::now();
        let mut dismissed = None;

        let stories = if self.show_filter_ui {
            filter_by_title(&state.data, &self.title_filter)
        } else {
            state.data.iter().collect()
        };

        if stories.is_empty() && !state.is_loading {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                let message = if state.data.is_empty() {
                    format!("No stories found for '{}'", self.search.submitted())
                } else {
                    format!("No loaded story matches '{}'", self.title_filter)
                };
                ui.label(
                    RichText::new(message)
                        .color(self.theme.secondary_text)
                        .size(18.0)
                        .italics(),
                );
            });
            return None;
        }

        ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
            for (rank, story) in stories.iter().enumerate() {
                egui::Frame::new()
                    .fill(self.theme.card_background)
                    .corner_radius(CornerRadius::same(8))
                    .stroke(Stroke::new(1.0, self.theme.separator))
                    .inner_margin(12.0)
                    .outer_margin(egui::vec2(8.0, 6.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(format!("{}", rank + 1))
                                    .color(self.theme.secondary_text)
                                    .size(16.0),
                            );
                            ui.add_space(8.0);

                            let title_label = ui.add(
                                egui::Label::new(
                                    RichText::new(&story.title)
                                        .color(self.theme.text)
                                        .size(16.0)
                                        .strong(),
                                )
                                .sense(egui::Sense::click()),
                            );

                            if title_label.clicked() && !story.url.is_empty() {
                                self.open_link(&story.url);
                            }

                            if title_label.hovered() && !story.url.is_empty() {
                                ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                            }

                            let domain = story.domain();
                            if !domain.is_empty() {
                                ui.add_space(8.0);
                                ui.label(
                                    RichText::new(format!("({})", domain))
                                        .color(self.theme.secondary_text)
                                        .italics(),
                                );
                            }

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.label(
                                    RichText::new(format!("{} pts", story.points))
                                        .color(self.theme.points_color(story.points))
                                        .strong(),
                                );
                            });
                        });

                        ui.horizontal(|ui| {
                            ui.label(RichText::new("by").color(self.theme.secondary_text).size(14.0));
                            ui.add_space(4.0);
                            ui.label(RichText::new(&story.author).color(self.theme.text).size(14.0));

                            if let Some(age) = story.age_label(now) {
                                ui.add_space(8.0);
                                ui.label(RichText::new(age).color(self.theme.secondary_text).size(14.0));
                            }

                            ui.add_space(8.0);
                            ui.label(
                                RichText::new(format!("{} comments", story.num_comments))
                                    .color(self.theme.secondary_text)
                                    .size(14.0),
                            );

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                let dismiss_btn = ui.add_sized(
                                    [90.0, 28.0],
                                    egui::Button::new(
                                        RichText::new("Dismiss")
                                            .size(14.0)
                                            .color(self.theme.button_foreground),
                                    )
                                    .corner_radius(CornerRadius::same(6))
                                    .fill(self.theme.button_background),
                                );

                                if dismiss_btn.clicked() {
                                    dismissed = Some((*story).clone());
                                }
                            });
                        });
                    });
            }
        });

        dismissed
    }
}

impl eframe::App for HackerStoriesApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        storage.set_string("is_dark_mode", self.theme.is_dark.to_string());
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme.apply_to_ctx(ctx);

        self.policy.pump(&mut self.stories);
        if !self.policy.is_idle() {
            // Worker threads cannot wake the UI, so poll while requests are out
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.process_keyboard_shortcuts(ctx);

        if let Some(story) = self.pending_dismiss.take() {
            self.stories.dismiss(&story);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(
                    RichText::new("Hacker Stories")
                        .color(self.theme.highlight)
                        .size(24.0),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_icon = if self.theme.is_dark { "☀" } else { "☾" };
                    if ui
                        .add(
                            egui::Button::new(RichText::new(theme_icon).size(18.0))
                                .min_size(egui::vec2(32.0, 32.0))
                                .corner_radius(CornerRadius::same(6))
                                .fill(self.theme.button_background),
                        )
                        .on_hover_text("Toggle theme")
                        .clicked()
                    {
                        self.toggle_theme();
                    }

                    ui.add_space(8.0);
                    if ui
                        .add(
                            egui::Button::new(RichText::new("⟳").size(18.0))
                                .min_size(egui::vec2(32.0, 32.0))
                                .corner_radius(CornerRadius::same(6))
                                .fill(self.theme.button_background),
                        )
                        .on_hover_text("Refresh")
                        .clicked()
                    {
                        self.refresh();
                    }
                });
            });

            ui.add(egui::Separator::default().spacing(12.0));
            self.render_search_bar(ui);

            if self.show_filter_ui {
                ui.add_space(4.0);
                self.render_filter_bar(ui);
            }

            ui.add_space(8.0);
            self.render_status(ui);
            ui.add(egui::Separator::default().spacing(8.0));

            if let Some(story) = self.render_story_list(ui) {
                self.pending_dismiss = Some(story);
                ctx.request_repaint();
            }
        });
    }
}
