//! User-facing texts

use crate::models::{Feature, Interval};

pub const GREETING: &str = "Привет! Я бот-предсказатель погоды!\n\
Укажи точки маршрута, а я предоставлю тебе данные о погоде!\n\
Используй /weather для начала работы или /help для справки";

pub const HELP: &str = "*Привет! Я бот-предсказатель погоды!*\n\n\
Я помогу тебе узнать погоду на маршруте, который ты укажешь. Вот как это работает:\n\
1. Напиши команду `/weather`, чтобы начать.\n\
2. Укажи город - начало маршрута.\n\
3. Укажи город - конец маршрута.\n\
4. Если нужно, добавь промежуточные точки маршрута.\n\
5. Выбери интервал прогноза (1, 3 или 5 дней).\n\
6. Выбери характеристику для построения графика (температура, влажность, ветер, осадки).\n\
7. Получи прогноз погоды и график!\n\n\
*Доступные команды:*\n\
- `/start` - Начать общение с ботом.\n\
- `/weather` - Начать процесс получения погоды.\n\
- `/help` - Показать эту справку.\n\n\
*Пример использования:*\n\
1. `/weather`\n\
2. Введите город: Москва\n\
3. Введите город: Санкт-Петербург\n\
4. Добавьте промежуточные точки (если нужно): Нижний Новгород, Казань\n\
5. Выберите интервал: 3 дня\n\
6. Выберите характеристику: Температура\n\
7. Получите прогноз и график!";

pub const ASK_START: &str = "Введите город - начало маршрута:";
pub const ASK_END: &str = "Введите город - конец маршрута:";
pub const ASK_STOP_DECISION: &str = "Хотите добавить промежуточные точки маршрута?";
pub const ASK_STOPS: &str = "Введите промежуточные точки маршрута через запятую:";
pub const ASK_INTERVAL: &str = "Выберите интервал для прогноза погоды:";
pub const ASK_FEATURE: &str = "Выберите характеристику для построения графика:";
pub const NO_DATA: &str = "Нет данных для построения графика :<";
pub const CHART_FAILED: &str = "Не удалось построить график, попробуйте ещё раз позже";
pub const UNRECOGNIZED: &str =
    "Извините, я не понял ваш запрос. Пожалуйста, напишите /start и следуйте инструкциям";

#[must_use]
pub fn collecting(interval: Interval) -> String {
    format!(
        "Собираю информацию о погоде для вашего маршрута на {}...",
        interval.label()
    )
}

#[must_use]
pub fn location_not_found(point: &str) -> String {
    format!("Не удалось найти локацию: {point}")
}

#[must_use]
pub fn forecast_unavailable(point: &str) -> String {
    format!("Не удалось получить прогноз для: {point}")
}

#[must_use]
pub fn forecast_header(point: &str, interval: Interval) -> String {
    format!("Прогноз погоды для {point} на {}:\n\n", interval.label())
}

#[must_use]
pub fn chart_caption(feature: Feature) -> String {
    format!("График погоды по маршруту ({})", feature.display_name())
}
