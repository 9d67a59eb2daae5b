use std::ops::Range;
use std::rc::Rc;
use std::vec::Vec;

pub type Program = Vec<(Stmt, Range<usize>)>;

#[derive(Debug, Clone)]
pub enum Stmt {
    Let {
        name: String,
        type_annot: Option<(TypeAnnot, Range<usize>)>,
        value: Box<(Expr, Range<usize>)>,
    },
    Expr((Expr, Range<usize>)),
    Print(Vec<(Expr, Range<usize>)>),
    Block(Vec<(Stmt, Range<usize>)>),

    If {
        condition: Box<(Expr, Range<usize>)>,
        then_branch: Vec<(Stmt, Range<usize>)>,
        // either a `Block` or a chained `If`
        else_branch: Option<Box<(Stmt, Range<usize>)>>,
    },
    While {
        condition: Box<(Expr, Range<usize>)>,
        body: Vec<(Stmt, Range<usize>)>,
    },
    For {
        init: Option<Box<(Stmt, Range<usize>)>>,
        condition: Option<Box<(Expr, Range<usize>)>>,
        update: Option<Box<(Expr, Range<usize>)>>,
        body: Vec<(Stmt, Range<usize>)>,
    },
    ForEach {
        var: String,
        iterable: Box<(Expr, Range<usize>)>,
        body: Vec<(Stmt, Range<usize>)>,
    },
    Switch {
        scrutinee: Box<(Expr, Range<usize>)>,
        cases: Vec<SwitchCase>,
        default: Option<Vec<(Stmt, Range<usize>)>>,
    },
    Try {
        body: Vec<(Stmt, Range<usize>)>,
        binding: Option<String>,
        handler: Vec<(Stmt, Range<usize>)>,
    },

    Return(Option<Box<(Expr, Range<usize>)>>),
    Break,
    Continue,

    Function(Rc<Function>),
    Class(Rc<Class>),
    Recipe(Rc<Recipe>),
    Import {
        path: String,
        alias: Option<String>,
    },
    Sleep(Box<(Expr, Range<usize>)>),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Number(f64),
    String(String),
    Bool(bool),
    Null,

    Variable(String),

    Array {
        elements: Vec<(Expr, Range<usize>)>,
    },
    Object {
        entries: Vec<(String, (Expr, Range<usize>))>,
    },

    BinOp {
        operator: BinOp,
        l_value: Box<(Expr, Range<usize>)>,
        r_value: Box<(Expr, Range<usize>)>,
    },
    UnOp {
        unop: UnOp,
        expression: Box<(Expr, Range<usize>)>,
    },
    Assign {
        l_value: Box<(Expr, Range<usize>)>,
        r_value: Box<(Expr, Range<usize>)>,
    },

    Call {
        function: Box<(Expr, Range<usize>)>,
        args: Vec<(Expr, Range<usize>)>,
    },
    Member {
        object: Box<(Expr, Range<usize>)>,
        field_name: String,
    },
    Index {
        array: Box<(Expr, Range<usize>)>,
        index: Box<(Expr, Range<usize>)>,
    },

    New {
        class_name: String,
        args: Vec<(Expr, Range<usize>)>,
    },
    This,
    /// `super(args)` when `method` is `None`, `super.method(args)` otherwise.
    SuperCall {
        method: Option<String>,
        args: Vec<(Expr, Range<usize>)>,
    },
    Grind(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,

    And,
    Or,

    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinOp {
    /// Binding strength, higher binds tighter. Assignment sits below all of these.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Mul | BinOp::Div | BinOp::Mod => 7,
            BinOp::Add | BinOp::Sub => 6,
            BinOp::Shl | BinOp::Shr => 5,
            BinOp::BitAnd | BinOp::BitXor | BinOp::BitOr => 4,
            BinOp::Eq
            | BinOp::NotEq
            | BinOp::Less
            | BinOp::Greater
            | BinOp::LessEq
            | BinOp::GreaterEq => 3,
            BinOp::And => 2,
            BinOp::Or => 1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::LessEq => "<=",
            BinOp::GreaterEq => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Minus,
    Not,
    BitNot,
}

#[derive(Debug, Clone)]
pub enum TypeAnnot {
    Named(String),
    Array(Box<TypeAnnot>),
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub type_annot: Option<TypeAnnot>,
    pub range: Range<usize>,
}

#[derive(Debug)]
pub struct Function {
    pub name: (String, Range<usize>),
    pub args: Vec<Param>,
    pub body: Vec<(Stmt, Range<usize>)>,
    pub return_type: Option<(TypeAnnot, Range<usize>)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Debug)]
pub struct Field {
    pub name: (String, Range<usize>),
    pub visibility: Visibility,
    pub type_annot: Option<TypeAnnot>,
    pub default: (Expr, Range<usize>),
}

#[derive(Debug)]
pub struct Class {
    pub name: (String, Range<usize>),
    /// The `blend` clause. It may name a parent class or a recipe.
    pub parent: Option<(String, Range<usize>)>,
    pub fields: Vec<Field>,
    pub methods: Vec<(Visibility, Rc<Function>)>,
}

#[derive(Debug, Clone)]
pub struct MethodSignature {
    pub name: String,
    pub args: Vec<Param>,
    pub return_type: Option<TypeAnnot>,
    pub range: Range<usize>,
}

#[derive(Debug)]
pub struct Recipe {
    pub name: (String, Range<usize>),
    pub methods: Vec<MethodSignature>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub label: (Literal, Range<usize>),
    pub body: Vec<(Stmt, Range<usize>)>,
}
