// 子模块
mod academics;
mod accounts;
mod profiles;
