// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{Extension, Json};
use std::sync::Arc;

use crate::{
    application::{
        dto::analyze_request::AnalyzeRequestDto,
        use_cases::analyze_product::AnalyzeProductUseCase,
    },
    domain::models::analysis::AnalysisReport,
    presentation::errors::AppError,
};

/// 处理评论分析请求
///
/// # 参数
///
/// * `use_case` - 商品评论分析用例
/// * `payload` - 分析请求数据
///
/// # 返回值
///
/// 成功时返回完整的分析报告
///
/// # 错误
///
/// - 请求参数验证失败时返回 400
/// - 无法启动浏览器会话时返回 502
pub async fn analyze(
    Extension(use_case): Extension<Arc<AnalyzeProductUseCase>>,
    Json(payload): Json<AnalyzeRequestDto>,
) -> Result<Json<AnalysisReport>, AppError> {
    let report = use_case.execute(payload).await?;
    Ok(Json(report))
}
