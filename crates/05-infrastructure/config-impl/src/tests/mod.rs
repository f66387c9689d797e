//! 配置中心实现的单元测试

mod resolver_tests;
