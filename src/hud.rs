/// Icon shown on the start/stop button
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ButtonIcon {
    Play,
    Stop,
}

impl ButtonIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            ButtonIcon::Play => "▶",
            ButtonIcon::Stop => "■",
        }
    }
}

/// UI boundary the game drives. Nothing in here knows about terminals.
pub trait GameView {
    fn show_timer_and_score(&mut self);
    fn hide_timer_and_score(&mut self);
    fn update_timer(&mut self, remaining_secs: u32);
    /// `clams_left` is what the player still has to collect
    fn update_score(&mut self, clams_left: usize);
    fn show_button(&mut self, icon: ButtonIcon);
    fn hide_button(&mut self);
}

/// Timer text as `minutes:seconds`, neither part padded
pub fn format_time(secs: u32) -> String {
    format!("{}:{}", secs / 60, secs % 60)
}

/// Heads-up display state rendered above the field
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub timer_visible: bool,
    pub score_visible: bool,
    pub timer_text: String,
    pub score_text: String,
    pub button_visible: bool,
    pub button_icon: ButtonIcon,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            timer_visible: false,
            score_visible: false,
            timer_text: String::new(),
            score_text: String::new(),
            button_visible: true,
            button_icon: ButtonIcon::Play,
        }
    }
}

impl GameView for Hud {
    fn show_timer_and_score(&mut self) {
        self.timer_visible = true;
        self.score_visible = true;
    }

    fn hide_timer_and_score(&mut self) {
        self.timer_visible = false;
        self.score_visible = false;
    }

    fn update_timer(&mut self, remaining_secs: u32) {
        self.timer_text = format_time(remaining_secs);
    }

    fn update_score(&mut self, clams_left: usize) {
        self.score_text = clams_left.to_string();
    }

    fn show_button(&mut self, icon: ButtonIcon) {
        self.button_icon = icon;
        self.button_visible = true;
    }

    fn hide_button(&mut self) {
        self.button_visible = false;
    }
}
