//! 标记宏集成测试
//!
//! 以生成的标记定义文件相同的方式引入标记：通过模块重新导出，再按名称使用。

mod markers {
    #[allow(unused_imports)]
    pub use ::component_macros::{inject, scoped, singleton, transient};

    #[allow(dead_code)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ServiceLifetime {
        Singleton = 0,
        Scoped = 1,
        Transient = 2,
    }
}

mod services {
    use crate::markers::{inject, scoped, singleton, transient};

    pub trait Repository {
        fn find(&self, id: u32) -> Option<String>;
    }

    #[singleton]
    #[derive(Debug, Default)]
    pub struct MemoryRepository {
        pub(crate) rows: Vec<(u32, String)>,
    }

    impl Repository for MemoryRepository {
        fn find(&self, id: u32) -> Option<String> {
            self.rows
                .iter()
                .find(|(row_id, _)| *row_id == id)
                .map(|(_, name)| name.clone())
        }
    }

    #[scoped]
    pub struct RequestContext<'a> {
        pub user: &'a str,
    }

    #[transient]
    #[derive(Debug, PartialEq)]
    pub enum Command {
        Create { name: String },
        Delete(u32),
    }

    #[inject(crate::markers::ServiceLifetime::Scoped)]
    pub struct UnitOfWork {
        pub pending: usize,
    }
}

use services::{Command, MemoryRepository, Repository, RequestContext, UnitOfWork};

#[test]
fn test_marked_types_keep_their_behavior() {
    let repository = MemoryRepository {
        rows: vec![(1, "alice".to_string())],
    };
    assert_eq!(repository.find(1).as_deref(), Some("alice"));
    assert_eq!(repository.find(2), None);

    let dynamic: &dyn Repository = &repository;
    assert!(dynamic.find(1).is_some());
}

#[test]
fn test_generic_and_enum_items_pass_through() {
    let context = RequestContext { user: "bob" };
    assert_eq!(context.user, "bob");

    let command = Command::Create {
        name: "report".to_string(),
    };
    assert_ne!(command, Command::Delete(1));

    let unit = UnitOfWork { pending: 2 };
    assert_eq!(unit.pending, 2);
}

#[test]
fn test_lifetime_enum_discriminants() {
    use markers::ServiceLifetime;

    assert_eq!(ServiceLifetime::Singleton as u8, 0);
    assert_eq!(ServiceLifetime::Scoped as u8, 1);
    assert_eq!(ServiceLifetime::Transient as u8, 2);
}
