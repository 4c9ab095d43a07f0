use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

pub(crate) const START_QUIZ_BUTTON: &str = "Start quiz";
pub(crate) const STATISTICS_BUTTON: &str = "Statistics";

/// One button per row; the callback data is the option text itself.
pub(crate) fn options_keyboard(options: &[String]) -> InlineKeyboardMarkup {
    let keyboard: Vec<Vec<InlineKeyboardButton>> = options
        .iter()
        .map(|option| vec![InlineKeyboardButton::callback(option, option)])
        .collect();

    InlineKeyboardMarkup::new(keyboard)
}

pub(crate) fn action_keyboard() -> KeyboardMarkup {
    let keyboard = vec![vec![
        KeyboardButton::new(START_QUIZ_BUTTON),
        KeyboardButton::new(STATISTICS_BUTTON),
    ]];

    KeyboardMarkup::new(keyboard)
}
