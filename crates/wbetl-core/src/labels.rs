//! Human-readable labels for advertising campaign codes.
//!
//! Codes outside the known set pass through as their decimal string so new
//! upstream codes are stored rather than lost.

use std::borrow::Cow;

#[must_use]
pub fn campaign_status_label(code: i64) -> Cow<'static, str> {
    let label = match code {
        -1 => "Кампания в процессе удаления",
        4 => "Готова к запуску",
        7 => "Кампания завершена",
        8 => "Отказался",
        9 => "Идут показы",
        11 => "Кампания на паузе",
        other => return Cow::Owned(other.to_string()),
    };
    Cow::Borrowed(label)
}

#[must_use]
pub fn campaign_type_label(code: i64) -> Cow<'static, str> {
    let label = match code {
        4 => "Кампания в каталоге (устаревший тип)",
        5 => "Кампания в карточке товара (устаревший тип)",
        6 => "Кампания в поиске (устаревший тип)",
        7 => "Кампания в рекомендациях на главной странице (устаревший тип)",
        8 => "Автоматическая кампания",
        9 => "Аукцион",
        other => return Cow::Owned(other.to_string()),
    };
    Cow::Borrowed(label)
}
