use serde::Deserialize;
use ts_rs::TS;

// 录入评分请求
//
// 分数按浮点数接收，由账本校验为 [0, 100] 内的整数。
#[derive(Debug, Deserialize, TS)]
pub struct SetMarkRequest {
    pub score: f64,
}
