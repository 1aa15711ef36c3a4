// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 错误类型定义
pub mod errors;
/// HTML 文本提取工具
pub mod html_text;
/// 日志初始化
pub mod telemetry;
