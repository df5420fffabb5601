/// What the model answers when the picture holds no food.
pub const NO_FOOD_SENTINEL: &str = "無食物";

/// Instruction sent alongside every image.
pub const RECOGNITION_PROMPT: &str = "請辨識這張圖片中的食物，並依下列格式回覆：
- 有食物時：只回傳食物名稱，以頓號或逗號分隔，例如「白飯、炒蛋、青菜」。
- 沒有食物時：只回傳「無食物」。
除此之外不要輸出任何說明或多餘文字。";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_sentinel() {
        assert!(RECOGNITION_PROMPT.contains(&format!("「{NO_FOOD_SENTINEL}」")));
    }
}
