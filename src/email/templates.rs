pub fn render_set_password(name: &str, link: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Bem-vindo ao ReservaLab</h2>
    <p>Olá, {name}!</p>
    <p>Você foi cadastrado no sistema ReservaLab. Para definir sua senha e ativar sua conta, clique no link abaixo:</p>
    <p><a href="{link}" style="display: inline-block; padding: 10px 20px; background: #0070f3; color: white; text-decoration: none; border-radius: 4px;">Definir senha</a></p>
    <p style="color: #666; font-size: 14px;">Esse link é válido por 1 hora.</p>
</body>
</html>"#
    )
}

pub fn render_activation(name: &str, link: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Ative sua conta</h2>
    <p>Olá, {name}!</p>
    <p>Seu cadastro foi realizado com sucesso. Para ativar sua conta, clique no link abaixo:</p>
    <p><a href="{link}" style="display: inline-block; padding: 10px 20px; background: #0070f3; color: white; text-decoration: none; border-radius: 4px;">Ativar conta</a></p>
    <p style="color: #666; font-size: 14px;">Esse link é válido por 1 hora.</p>
</body>
</html>"#
    )
}

pub fn render_password_reset(name: &str, link: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Redefinição de senha</h2>
    <p>Olá, {name}!</p>
    <p>Para definir sua nova senha, clique no link abaixo:</p>
    <p><a href="{link}" style="display: inline-block; padding: 10px 20px; background: #0070f3; color: white; text-decoration: none; border-radius: 4px;">Redefinir senha</a></p>
    <p style="color: #666; font-size: 14px;">Esse link é válido por 1 hora. Se você não solicitou, ignore este e-mail.</p>
</body>
</html>"#
    )
}

pub fn render_two_factor_code(code: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Código de verificação</h2>
    <p>Use o código abaixo para concluir seu login no ReservaLab:</p>
    <p style="font-size: 28px; font-weight: bold; letter-spacing: 4px;">{code}</p>
    <p style="color: #666; font-size: 14px;">Esse código expira em 10 minutos.</p>
</body>
</html>"#
    )
}
