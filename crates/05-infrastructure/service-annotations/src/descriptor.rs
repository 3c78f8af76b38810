//! 类型描述符
//!
//! 目录中一个类型的元数据：类型标识、实现类型、按声明顺序排列的注解，
//! 以及配置方法查找所需的方法与参数信息。

use crate::annotation::ServiceAnnotation;
use crate::error::{ArgumentError, BoxError};
use di_abstractions::{downcast_instance, ImplementationType, Injectable, Instance};
use infrastructure_common::TypeInfo;
use std::fmt;
use std::sync::Arc;

/// 方法调用函数
pub type Invoker = Arc<dyn Fn(&Arguments) -> Result<(), BoxError> + Send + Sync>;

/// 类型描述符
#[derive(Clone)]
pub struct TypeDescriptor {
    implementation: ImplementationType,
    annotations: Vec<Arc<dyn ServiceAnnotation>>,
    methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// 创建不可由容器构造的类型描述符
    pub fn of<T: Send + Sync + 'static>() -> Self {
        Self::from_implementation(ImplementationType::opaque::<T>())
    }

    /// 创建可由容器构造的类型描述符
    pub fn injectable<T: Injectable>() -> Self {
        Self::from_implementation(ImplementationType::of::<T>())
    }

    /// 由实现类型创建描述符
    pub fn from_implementation(implementation: ImplementationType) -> Self {
        Self {
            implementation,
            annotations: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// 追加注解（顺序即声明顺序）
    pub fn annotate(mut self, annotation: impl ServiceAnnotation + 'static) -> Self {
        self.annotations.push(Arc::new(annotation));
        self
    }

    /// 追加声明的方法
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// 类型信息
    pub fn type_info(&self) -> &TypeInfo {
        self.implementation.info()
    }

    /// 完整类型名称
    pub fn name(&self) -> &'static str {
        self.type_info().name()
    }

    /// 实现类型
    pub fn implementation_type(&self) -> &ImplementationType {
        &self.implementation
    }

    /// 按声明顺序排列的注解
    pub fn annotations(&self) -> &[Arc<dyn ServiceAnnotation>] {
        &self.annotations
    }

    /// 直接声明在该类型上的方法
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// 按名称查找声明的方法
    pub fn methods_named<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a MethodDescriptor> + 'n
    where
        'a: 'n,
    {
        self.methods.iter().filter(move |method| method.name() == name)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type", &self.name())
            .field("annotations", &self.annotations)
            .field("methods", &self.methods)
            .finish()
    }
}

/// 参数描述符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    name: String,
    type_info: TypeInfo,
}

impl ParameterDescriptor {
    /// 创建参数描述符
    pub fn new(name: impl Into<String>, type_info: TypeInfo) -> Self {
        Self {
            name: name.into(),
            type_info,
        }
    }

    /// 参数名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 参数类型
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }
}

/// 方法描述符
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    is_static: bool,
    parameters: Vec<ParameterDescriptor>,
    invoker: Option<Invoker>,
}

impl MethodDescriptor {
    /// 关联函数（无接收者，相当于静态方法）
    pub fn associated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_static: true,
            parameters: Vec::new(),
            invoker: None,
        }
    }

    /// 带接收者的实例方法
    pub fn instance(name: impl Into<String>) -> Self {
        Self {
            is_static: false,
            ..Self::associated(name)
        }
    }

    /// 追加参数，参数类型即上下文查找键
    pub fn parameter<T: ?Sized + 'static>(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(ParameterDescriptor::new(name, TypeInfo::of::<T>()));
        self
    }

    /// 设置调用函数
    pub fn invoker<F>(mut self, invoker: F) -> Self
    where
        F: Fn(&Arguments) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.invoker = Some(Arc::new(invoker));
        self
    }

    /// 方法名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 是否为静态方法
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// 按声明顺序排列的参数
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// 调用方法
    pub fn invoke(&self, arguments: &Arguments) -> Result<(), BoxError> {
        let invoker = self.invoker.as_ref().ok_or_else(|| ArgumentError::NotInvocable {
            method_name: self.name.clone(),
        })?;
        invoker(arguments)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("is_static", &self.is_static)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// 配置方法返回值到调用结果的转换
///
/// 配置方法可以返回 `()`，也可以返回错误可装箱的 `Result`
pub trait HookOutput {
    /// 转换为调用结果
    fn into_result(self) -> Result<(), BoxError>;
}

impl HookOutput for () {
    fn into_result(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<T, E> HookOutput for Result<T, E>
where
    E: Into<BoxError>,
{
    fn into_result(self) -> Result<(), BoxError> {
        self.map(drop).map_err(Into::into)
    }
}

/// 已解析的调用参数
#[derive(Clone, Default)]
pub struct Arguments {
    values: Vec<Instance>,
}

impl Arguments {
    /// 由按参数顺序排列的实例创建
    pub fn new(values: Vec<Instance>) -> Self {
        Self { values }
    }

    /// 取得指定位置的参数
    pub fn get<T>(&self, index: usize) -> Result<Arc<T>, ArgumentError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let value = self.values.get(index).ok_or(ArgumentError::Missing { index })?;
        downcast_instance::<T>(value).ok_or(ArgumentError::TypeMismatch {
            index,
            expected: std::any::type_name::<T>(),
        })
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否没有参数
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments").field("len", &self.values.len()).finish()
    }
}
