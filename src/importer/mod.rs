// ==========================================
// 出口报价计算引擎 - 导入层
// ==========================================
// 职责: 从 JSON 文件只读加载外部数据，供命令行与测试使用
// ==========================================

pub mod error;
pub mod snapshot_loader;

pub use error::{ImportError, ImportResult};
pub use snapshot_loader::{
    load_engine_config, load_request, load_snapshot, parse_snapshot,
};
