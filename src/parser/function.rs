use crate::ast::{Function, ParamDeclare, Stmt};
use crate::lexer::TokenKind;
use crate::parser::{ParseResult, Parser};
use crate::types::Type;

pub fn function_syntax() -> String {
    "the syntax for declaring a function is: \
     func function_name(arg1: type1, arg2: type2, ...) -> return_type { body }"
        .to_string()
}

impl Parser<'_> {
    /// `func name(param: type, ...) (-> type)? { body }`
    pub fn parse_function(&mut self) -> ParseResult<Stmt> {
        self.advance(); // 'func'

        let name = self
            .expect(TokenKind::Identifier, "expected function name after 'func'")
            .map_err(|e| e.with_note(function_syntax()))?;
        self.expect(
            TokenKind::OpenParen,
            &format!("expected '(' after the name of function '{}'", name.text),
        )
        .map_err(|e| e.with_note(function_syntax()))?;

        let params = self.parse_params()?;

        let (return_type, return_loc) = if self.check(TokenKind::Arrow) {
            self.advance();
            let type_name = self
                .expect(TokenKind::Identifier, "expected a return type after '->'")?;
            (self.context.get_type(&type_name.text), Some(type_name.loc))
        } else {
            (Type::Void, None)
        };

        let body = self.parse_block()?;

        Ok(Stmt::Function(Function {
            name: name.text,
            params,
            return_type,
            return_loc,
            body,
            loc: name.loc,
        }))
    }

    /// Parameter list after the opening '(', up to and including ')'.
    fn parse_params(&mut self) -> ParseResult<Vec<ParamDeclare>> {
        let mut params = vec![];
        if self.check(TokenKind::CloseParen) {
            self.advance();
            return Ok(params);
        }

        loop {
            let name = self.expect(
                TokenKind::Identifier,
                "expected parameter name in function declaration",
            )?;
            self.expect(
                TokenKind::Colon,
                "expected ':' after parameter name to specify parameter type",
            )?;
            let type_name = self.expect(
                TokenKind::Identifier,
                &format!("expected a type for parameter '{}'", name.text),
            )?;

            params.push(ParamDeclare {
                ty: self.context.get_type(&type_name.text),
                type_loc: type_name.loc,
                name: name.text,
                loc: name.loc,
            });

            match self.current().kind {
                TokenKind::Comma => {
                    self.advance();
                    if self.check(TokenKind::CloseParen) {
                        return Err(self
                            .unexpected("expected another parameter after ','")
                            .with_note("a trailing ',' is not allowed in a parameter list"));
                    }
                }
                TokenKind::CloseParen => {
                    self.advance();
                    return Ok(params);
                }
                _ => {
                    return Err(self
                        .unexpected("expected either ',' or ')' in function parameter list")
                        .with_note(function_syntax()));
                }
            }
        }
    }
}
