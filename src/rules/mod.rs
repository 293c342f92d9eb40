pub(crate) mod question;
pub(crate) mod vocabulary;
