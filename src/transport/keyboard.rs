use serde::{Deserialize, Serialize};

use super::Command;

const ROW_WIDTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButton {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
}

/// Answer choices first, then the fixed actions, laid out two per row.
pub fn reply_keyboard(choices: &[String]) -> ReplyKeyboardMarkup {
    let buttons: Vec<KeyboardButton> = choices
        .iter()
        .map(String::as_str)
        .chain([Command::NEXT, Command::ADD_WORD, Command::DELETE_WORD])
        .map(|text| KeyboardButton {
            text: text.to_string(),
        })
        .collect();

    ReplyKeyboardMarkup {
        keyboard: buttons.chunks(ROW_WIDTH).map(<[KeyboardButton]>::to_vec).collect(),
        resize_keyboard: true,
    }
}
