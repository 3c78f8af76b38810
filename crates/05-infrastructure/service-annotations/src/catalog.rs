//! 类型目录
//!
//! 一次扫描所覆盖的类型集合。[`Catalog`] 可以显式组装，
//! 也可以由 `#[annotate]` 在编译期生成、程序启动时登记的全局注册表物化。

use crate::descriptor::TypeDescriptor;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

/// 类型目录 trait
pub trait TypeCatalog {
    /// 目录名称，用于日志
    fn name(&self) -> &str;

    /// 目录中的类型描述符，顺序即扫描顺序
    fn types(&self) -> &[TypeDescriptor];
}

/// 声明了注解的类型
///
/// 由 `#[annotate]` 宏实现
pub trait Annotated {
    /// 构建类型描述符
    fn type_descriptor() -> TypeDescriptor;
}

/// 显式组装的类型目录
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    name: String,
    types: Vec<TypeDescriptor>,
}

impl Catalog {
    /// 创建空目录
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// 追加类型描述符
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.push(descriptor);
        self
    }

    /// 追加声明了注解的类型
    pub fn with<T: Annotated>(self) -> Self {
        self.with_type(T::type_descriptor())
    }

    /// 物化指定 crate 在编译期登记的类型
    ///
    /// 按源文件路径、再按行号排序，同一文件内即声明顺序。
    pub fn of_crate(crate_name: &str) -> Self {
        let mut registered: Vec<RegisteredType> = GLOBAL_TYPE_REGISTRY
            .read()
            .iter()
            .filter(|entry| entry.crate_name == crate_name)
            .copied()
            .collect();
        registered.sort_by(|a, b| (a.file, a.line).cmp(&(b.file, b.line)));

        debug!("物化 crate 类型目录: {} ({} 个类型)", crate_name, registered.len());
        registered
            .into_iter()
            .fold(Self::new(crate_name), |catalog, entry| {
                catalog.with_type((entry.descriptor)())
            })
    }
}

impl TypeCatalog for Catalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }
}

/// 编译期登记的类型
#[derive(Debug, Clone, Copy)]
struct RegisteredType {
    crate_name: &'static str,
    file: &'static str,
    line: u32,
    descriptor: fn() -> TypeDescriptor,
}

static GLOBAL_TYPE_REGISTRY: Lazy<RwLock<Vec<RegisteredType>>> = Lazy::new(|| RwLock::new(Vec::new()));

/// 登记一个声明了注解的类型
///
/// 由 `#[annotate]` 生成的启动函数调用
#[doc(hidden)]
pub fn register_type(crate_name: &'static str, file: &'static str, line: u32, descriptor: fn() -> TypeDescriptor) {
    GLOBAL_TYPE_REGISTRY.write().push(RegisteredType {
        crate_name,
        file,
        line,
        descriptor,
    });
}
