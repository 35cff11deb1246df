//! User-facing texts.

pub const WELCOME: &str = "Привет 👋 Давай попрактикуемся в английском языке. Тренировки можешь проходить в удобном для себя темпе.\n\nУ тебя есть возможность использовать тренажёр, как конструктор, и собирать свою собственную базу для обучения. Для этого воспользуйся инструментами:\n\nДобавить слово ➕\nУдалить слово 🔙";

pub const EMPTY_DATABASE: &str =
    "Ваша база данных пуста. Добавьте новые слова с помощью команды 'Добавить слово ➕'.";

pub const ADD_WORD_PROMPT: &str =
    "Отправьте новое слово в формате 'слово перевод', например 'Hello Привет'.";

pub const ADD_WORD_FORMAT_ERROR: &str =
    "Ошибка в формате. Пожалуйста, отправьте слово и перевод в формате 'слово перевод', например 'Hello Привет'.";

pub const STORE_FAILURE: &str = "Не удалось обратиться к базе слов. Попробуйте ещё раз чуть позже.";

pub fn card_prompt(translation: &str) -> String {
    format!("Выбери перевод слова:\n🇷🇺 {translation}")
}

pub fn correct_answer(word: &str, translation: &str) -> String {
    format!("Отлично!❤\n{word} -> {translation}")
}

pub fn wrong_answer(translation: &str) -> String {
    format!("Допущена ошибка!\nПопробуй ещё раз вспомнить слово 🇷🇺{translation}")
}

pub fn word_deleted(word: &str) -> String {
    format!("Слово '{word}' удалено из вашей базы данных.")
}

pub fn word_not_owned(word: &str) -> String {
    format!("Слово '{word}' не найдено среди добавленных вами слов, поэтому его нельзя удалить.")
}

pub fn word_added(word: &str, translation: &str) -> String {
    format!("Слово '{word}' с переводом '{translation}' добавлено в вашу базу данных.")
}
