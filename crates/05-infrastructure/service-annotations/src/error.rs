//! 注解错误定义
//!
//! 每个错误带有稳定的错误码、描述与修复提示

use std::fmt;
use thiserror::Error;

/// 装箱的底层错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// SA2000: 按名称找不到静态配置方法
    MethodNotFound,
    /// SA2001: 配置方法名称存在多个静态重载
    AmbiguousMethod,
    /// SA2002: 上下文中没有提供配置方法参数所需的实例
    ParameterNotProvided,
    /// SA2003: 配置方法调用失败
    InvocationFailed,
}

impl ErrorCode {
    /// 稳定的错误码字符串
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MethodNotFound => "SA2000",
            Self::AmbiguousMethod => "SA2001",
            Self::ParameterNotProvided => "SA2002",
            Self::InvocationFailed => "SA2003",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 服务注解错误
#[derive(Error, Debug)]
#[error("{code}:{description}")]
pub struct ServiceAnnotationError {
    code: ErrorCode,
    description: String,
    tip: String,
    #[source]
    source: Option<BoxError>,
}

impl ServiceAnnotationError {
    /// 创建新的注解错误
    pub fn new(code: ErrorCode, description: impl Into<String>, tip: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            tip: tip.into(),
            source: None,
        }
    }

    /// 附加底层错误
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 创建配置方法未找到错误
    pub fn method_not_found(method_name: &str, is_default: bool) -> Self {
        Self::new(
            ErrorCode::MethodNotFound,
            format!(
                "Configure services method not found by name: {}",
                quote_method_name(method_name, is_default)
            ),
            "Make sure the method exists and is static",
        )
    }

    /// 创建配置方法名称不唯一错误
    pub fn ambiguous_method(method_name: &str, is_default: bool, ambiguity: AmbiguousMatch) -> Self {
        Self::new(
            ErrorCode::AmbiguousMethod,
            format!(
                "Ambiguous configure services method name: {}",
                quote_method_name(method_name, is_default)
            ),
            "Make sure the method name is unique, in other words doesn't have overloads",
        )
        .with_source(ambiguity)
    }

    /// 创建参数实例缺失错误
    pub fn parameter_not_provided(
        parameter_type: &str,
        parameter_name: &str,
        declaring_type: &str,
        method_name: &str,
    ) -> Self {
        Self::new(
            ErrorCode::ParameterNotProvided,
            format!(
                "The instance of {parameter_type} was not provided. \
                 Required for parameter {parameter_name} in {declaring_type}::{method_name}"
            ),
            format!(
                "Make sure to add instance to annotation context. \
                 For example services.add_annotated_services_with(&catalog, \
                 |context| {{ context.add::<{parameter_type}>(instance); }})"
            ),
        )
    }

    /// 创建配置方法调用失败错误
    pub fn invocation_failed(declaring_type: &str, method_name: &str, source: impl Into<BoxError>) -> Self {
        Self::new(
            ErrorCode::InvocationFailed,
            format!("Configure services method failed: {declaring_type}::{method_name}"),
            "Make sure the method arguments match the declared parameter types",
        )
        .with_source(source)
    }

    /// 错误码
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// 错误描述
    pub fn description(&self) -> &str {
        &self.description
    }

    /// 修复提示
    pub fn tip(&self) -> &str {
        &self.tip
    }

    /// 底层错误
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

fn quote_method_name(method_name: &str, is_default: bool) -> String {
    if is_default {
        format!("\"{method_name}\" (default)")
    } else {
        format!("\"{method_name}\"")
    }
}

/// 同名静态方法存在多个候选
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Ambiguous match found: {candidates} static methods named \"{method_name}\" on {type_name}")]
pub struct AmbiguousMatch {
    /// 类型名称
    pub type_name: String,
    /// 方法名称
    pub method_name: String,
    /// 候选数量
    pub candidates: usize,
}

/// 配置方法参数错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("参数缺失: 位置 {index}")]
    Missing { index: usize },

    #[error("参数类型不匹配: 位置 {index}, 期望 {expected}")]
    TypeMismatch { index: usize, expected: &'static str },

    #[error("方法没有可调用的实现: {method_name}")]
    NotInvocable { method_name: String },
}
