//! Fixed user-facing reply texts.

/// Sent for plain text and unsupported events.
pub const GUIDANCE: &str = "請上傳食物圖片，我會幫你辨識圖片中的食物。";

pub const FETCH_FAILED: &str = "無法取得圖片，請再試一次";
pub const DECODE_FAILED: &str = "圖片格式有誤，請重傳";
pub const RECOGNITION_FAILED: &str = "辨識失敗，請稍後再試";
/// Recognition succeeded but found no food.
pub const NOT_RECOGNIZED: &str = "無法辨識圖片中的食物";

/// Save requested without a recent recognized image.
pub const UPLOAD_FIRST: &str = "請先上傳食物圖片再儲存";
pub const STORAGE_UNAVAILABLE: &str = "上傳失敗（S3 未設定）";
pub const UPLOAD_FAILED: &str = "上傳失敗";
pub const UPLOAD_SUCCEEDED: &str = "上傳成功";
